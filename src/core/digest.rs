//! Daily digest generation.
//!
//! Summarizes the previous 24 hours of activity - meetings held, offer
//! entries sent, sales closed with their revenue total - and the current
//! top-3 leaderboard, formatted as the morning greeting posted to the team
//! channel.

use crate::{
    core::profile::top_profiles,
    entities::{Booking, Meeting, Offer, Sale, booking, meeting, offer, profile, sale},
    errors::Result,
};
use chrono::Days;
use sea_orm::{DatabaseConnection, PaginatorTrait, prelude::*};
use serde::Serialize;

/// One day of activity plus the leaderboard podium.
#[derive(Debug, Clone, Serialize)]
pub struct DailyDigest {
    /// Meetings logged in the last 24 hours
    pub meetings: u64,
    /// Offer entries logged in the last 24 hours (row count, not batch sum)
    pub offers: u64,
    /// Bookings logged in the last 24 hours
    pub bookings: u64,
    /// Sales closed in the last 24 hours
    pub sales: Vec<sale::Model>,
    /// Top scorers with positive points, at most three
    pub podium: Vec<profile::Model>,
}

impl DailyDigest {
    /// Total revenue of the digest's sales, in SEK.
    #[must_use]
    pub fn revenue_total(&self) -> f64 {
        self.sales.iter().map(|sale| sale.revenue).sum()
    }
}

/// Collects activity for the 24 hours leading up to `now`.
pub async fn build_daily_digest(
    db: &DatabaseConnection,
    now: DateTimeUtc,
) -> Result<DailyDigest> {
    let since = now - Days::new(1);

    let meetings = Meeting::find()
        .filter(meeting::Column::CreatedAt.gte(since))
        .filter(meeting::Column::CreatedAt.lt(now))
        .count(db)
        .await?;
    let offers = Offer::find()
        .filter(offer::Column::CreatedAt.gte(since))
        .filter(offer::Column::CreatedAt.lt(now))
        .count(db)
        .await?;
    let bookings = Booking::find()
        .filter(booking::Column::CreatedAt.gte(since))
        .filter(booking::Column::CreatedAt.lt(now))
        .count(db)
        .await?;
    let sales = Sale::find()
        .filter(sale::Column::CreatedAt.gte(since))
        .filter(sale::Column::CreatedAt.lt(now))
        .all(db)
        .await?;
    let podium = top_profiles(db, 3).await?;

    Ok(DailyDigest {
        meetings,
        offers,
        bookings,
        sales,
        podium,
    })
}

/// Formats the digest as the morning team-channel message.
///
/// The podium section only renders with a full top three.
#[must_use]
pub fn format_daily_digest(digest: &DailyDigest) -> String {
    let podium = if digest.podium.len() == 3 {
        format!(
            "\nTopplistan ser ut som följande:\n\n🥇 {}\n🥈 {}\n🥉 {}\n",
            digest.podium[0].name, digest.podium[1].name, digest.podium[2].name
        )
    } else {
        String::new()
    };

    format!(
        "God morgon kära kollegor!\n\n\
         Igår utfärdades {}st affärer med ett ordervärde på {} SEK. \
         Det genomfördes {} möten och skickades {}st offerter. \
         Bra jobbat allihopa! 🎉🏆🥂\n\n\
         Kan vi slå dem siffrorna idag?\n{}\n\
         Lycka till!\nHälsningar, KISR 🤖",
        digest.sales.len(),
        digest.revenue_total(),
        digest.meetings,
        digest.offers,
        podium
    )
}
