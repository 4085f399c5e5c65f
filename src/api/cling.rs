//! Inbound webhooks from the e-sign provider.
//!
//! The provider calls `/api/cling/offer` when a document goes out and
//! `/api/cling/sale` when one is signed, so those records land in the
//! ledger without anyone typing them in. The seller is resolved by the
//! company-user email in the payload; an unknown email is rejected as
//! unauthenticated, which keeps strangers out of the ledger.

use crate::{
    api::{ApiResult, AppState},
    core::{
        offer as offer_core, profile as profile_core, sale as sale_core,
        sale::{SaleInput, ServiceLine},
    },
    entities::{Service, offer, service},
    errors::{Error, Result},
};
use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::NaiveDate;
use sea_orm::prelude::*;
use serde::Deserialize;

/// Envelope the provider wraps around every event.
#[derive(Debug, Deserialize)]
pub struct ClingEvent {
    /// Event payload
    pub data: ClingDocument,
}

/// The document the event describes. Offer events carry no articles;
/// sale events list the signed articles and the template they came from.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClingDocument {
    /// Account that sent the document
    pub company_user: ClingCompanyUser,
    /// Recipients, concatenated into the record name
    #[serde(default)]
    pub clients: Vec<ClingClient>,
    /// Document timestamp, ISO 8601
    pub created_at: String,
    /// Template the document was built from, matched against the service
    /// catalog on sale events
    #[serde(default)]
    pub template: Option<ClingTemplate>,
    /// Billed line-items, amounts in öre
    #[serde(default)]
    pub articles: Vec<ClingArticle>,
}

/// Sender identity inside the payload.
#[derive(Debug, Deserialize)]
pub struct ClingCompanyUser {
    /// Email matched against profile emails
    pub email: String,
}

/// A document recipient.
#[derive(Debug, Deserialize)]
pub struct ClingClient {
    /// Recipient display name
    pub name: String,
}

/// The document's template.
#[derive(Debug, Deserialize)]
pub struct ClingTemplate {
    /// Template name, matched against service names
    pub name: String,
}

/// A billed line-item.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClingArticle {
    /// Line total in öre
    pub total_amount: i64,
}

impl ClingDocument {
    /// Splits the ISO timestamp into the record's date and `HH:MM` time.
    fn date_and_time(&self) -> Result<(NaiveDate, String)> {
        let (date_part, time_part) =
            self.created_at
                .split_once('T')
                .ok_or_else(|| Error::Validation {
                    message: format!("Malformed document timestamp: {}", self.created_at),
                })?;
        let date = date_part.parse::<NaiveDate>().map_err(|_| Error::Validation {
            message: format!("Malformed document date: {date_part}"),
        })?;
        let time = time_part.chars().take(5).collect();
        Ok((date, time))
    }

    /// Recipient names joined into one record name.
    fn record_name(&self) -> String {
        self.clients
            .iter()
            .map(|client| client.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Signed revenue in SEK, summed over the articles.
    fn revenue(&self) -> f64 {
        let total: i64 = self.articles.iter().map(|article| article.total_amount).sum();
        #[allow(clippy::cast_precision_loss)]
        let sek = total as f64 / 100.0;
        sek
    }
}

/// Resolves the sending profile or rejects the event as unauthenticated.
async fn require_seller(
    state: &AppState,
    document: &ClingDocument,
) -> Result<crate::entities::profile::Model> {
    profile_core::find_profile_by_email(&state.db, &document.company_user.email)
        .await?
        .ok_or(Error::NotAuthenticated)
}

/// `POST /api/cling/offer`
///
/// A sent document counts as one offer for the sending profile.
pub async fn offer(
    State(state): State<AppState>,
    Json(event): Json<ClingEvent>,
) -> ApiResult<(StatusCode, Json<offer::Model>)> {
    let seller = require_seller(&state, &event.data).await?;
    let (date, time) = event.data.date_and_time()?;
    let created = offer_core::create_offer(
        &state.db,
        &seller.id,
        event.data.record_name(),
        date,
        time,
        1,
    )
    .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// `POST /api/cling/sale`
///
/// A signed document becomes a sale crediting its article total. The
/// document's template is matched against the service catalog to attach
/// the sold service; zero-value documents are acknowledged and dropped.
pub async fn sale(
    State(state): State<AppState>,
    Json(event): Json<ClingEvent>,
) -> ApiResult<Response> {
    let seller = require_seller(&state, &event.data).await?;

    let revenue = event.data.revenue();
    if revenue <= 0.0 {
        return Ok(StatusCode::OK.into_response());
    }

    let (date, time) = event.data.date_and_time()?;
    let services = match &event.data.template {
        Some(template) => Service::find()
            .filter(service::Column::Name.eq(template.name.as_str()))
            .one(&state.db)
            .await
            .map_err(Error::from)?
            .map(|matched| {
                vec![ServiceLine {
                    service_id: matched.id,
                    subscription: String::new(),
                }]
            })
            .unwrap_or_default(),
        None => Vec::new(),
    };

    let created = sale_core::create_sale(
        &state.db,
        &seller.id,
        SaleInput {
            name: event.data.record_name(),
            date,
            time,
            amount: 1,
            revenue,
            invoice: "1 månad".to_string(),
            customer: None,
            services,
        },
    )
    .await?;
    state.notifier.sale_closed(&seller.name, created.revenue);

    Ok((StatusCode::CREATED, Json(created)).into_response())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::api::ApiError;
    use crate::core::profile::require_profile;
    use crate::core::service::create_service;
    use crate::core::sale::list_sales;
    use crate::entities::{Offer, Sale};
    use crate::notify::Notifier;
    use crate::test_utils::*;

    async fn webhook_state() -> Result<AppState> {
        Ok(AppState {
            db: setup_test_db().await?,
            notifier: Notifier::disabled(),
            digest_token: None,
        })
    }

    fn event(email: &str, articles: Vec<i64>, template: Option<&str>) -> ClingEvent {
        ClingEvent {
            data: ClingDocument {
                company_user: ClingCompanyUser {
                    email: email.to_string(),
                },
                clients: vec![
                    ClingClient {
                        name: "Acme AB".to_string(),
                    },
                    ClingClient {
                        name: "Beta HB".to_string(),
                    },
                ],
                created_at: "2026-03-05T09:30:00.000Z".to_string(),
                template: template.map(|name| ClingTemplate {
                    name: name.to_string(),
                }),
                articles: articles
                    .into_iter()
                    .map(|total_amount| ClingArticle { total_amount })
                    .collect(),
            },
        }
    }

    #[tokio::test]
    async fn test_offer_webhook_credits_sender() -> Result<()> {
        let state = webhook_state().await?;
        let profile = create_test_profile(&state.db, "anna", "Anna").await?;

        let (status, Json(created)) = offer(
            State(state.clone()),
            Json(event("anna@example.com", vec![], None)),
        )
        .await
        .map_err(|e| e.0)?;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created.name, "Acme AB, Beta HB");
        assert_eq!(created.amount, 1);
        assert_eq!(created.date, "2026-03-05".parse::<chrono::NaiveDate>().unwrap());
        assert_eq!(created.time, "09:30");

        let ledger = require_profile(&state.db, &profile.id).await?;
        assert_eq!(ledger.points, 3000.0);
        assert_eq!(ledger.offer_count, 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_email_is_rejected() -> Result<()> {
        let state = webhook_state().await?;
        create_test_profile(&state.db, "anna", "Anna").await?;

        let offer_result = offer(
            State(state.clone()),
            Json(event("stranger@example.com", vec![], None)),
        )
        .await;
        assert!(matches!(
            offer_result,
            Err(ApiError(Error::NotAuthenticated))
        ));

        let sale_result = sale(
            State(state.clone()),
            Json(event("stranger@example.com", vec![149_900], None)),
        )
        .await;
        assert!(matches!(
            sale_result,
            Err(ApiError(Error::NotAuthenticated))
        ));

        // Nothing landed
        assert_eq!(Offer::find().all(&state.db).await.map_err(Error::from)?.len(), 0);
        assert_eq!(Sale::find().all(&state.db).await.map_err(Error::from)?.len(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_sale_webhook_credits_revenue_and_attaches_service() -> Result<()> {
        let state = webhook_state().await?;
        let profile = create_test_profile(&state.db, "anna", "Anna").await?;
        let fiber = create_service(&state.db, "Fiber".to_string(), "10".to_string()).await?;

        // 99 900 + 50 000 öre signed on a Fiber template
        let response = sale(
            State(state.clone()),
            Json(event("anna@example.com", vec![99_900, 50_000], Some("Fiber"))),
        )
        .await
        .map_err(|e| e.0)?;
        assert_eq!(response.status(), StatusCode::CREATED);

        let ledger = require_profile(&state.db, &profile.id).await?;
        assert_eq!(ledger.points, 1499.0);
        assert_eq!(ledger.sale_count, 1499.0);

        let sales = list_sales(&state.db, chrono::Utc::now().date_naive()).await?;
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].sale.revenue, 1499.0);
        assert_eq!(sales[0].sale.invoice, "1 månad");
        assert_eq!(sales[0].services.len(), 1);
        assert_eq!(sales[0].services[0].service.id, fiber.id);

        Ok(())
    }

    #[tokio::test]
    async fn test_zero_value_sale_is_acknowledged_and_dropped() -> Result<()> {
        let state = webhook_state().await?;
        let profile = create_test_profile(&state.db, "anna", "Anna").await?;

        let response = sale(
            State(state.clone()),
            Json(event("anna@example.com", vec![], None)),
        )
        .await
        .map_err(|e| e.0)?;
        assert_eq!(response.status(), StatusCode::OK);

        let ledger = require_profile(&state.db, &profile.id).await?;
        assert_eq!(ledger.points, 0.0);
        assert_eq!(ledger.sale_count, 0.0);
        assert_eq!(Sale::find().all(&state.db).await.map_err(Error::from)?.len(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_template_still_records_the_sale() -> Result<()> {
        let state = webhook_state().await?;
        let profile = create_test_profile(&state.db, "anna", "Anna").await?;

        let response = sale(
            State(state.clone()),
            Json(event("anna@example.com", vec![120_000], Some("Okänt paket"))),
        )
        .await
        .map_err(|e| e.0)?;
        assert_eq!(response.status(), StatusCode::CREATED);

        let ledger = require_profile(&state.db, &profile.id).await?;
        assert_eq!(ledger.points, 1200.0);

        let sales = list_sales(&state.db, chrono::Utc::now().date_naive()).await?;
        assert_eq!(sales.len(), 1);
        assert!(sales[0].services.is_empty());

        Ok(())
    }
}
