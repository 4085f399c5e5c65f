//! Team chat notifications over an incoming webhook.
//!
//! Announcements are fire-and-forget: delivery happens on a spawned task and
//! failures are logged, never surfaced to the request that triggered them. A
//! missing webhook URL disables announcements entirely, which keeps local
//! development and tests quiet.

use serde_json::json;
use tracing::{debug, warn};

/// Posts celebration and digest messages to the configured webhook.
#[derive(Debug, Clone)]
pub struct Notifier {
    webhook_url: Option<String>,
    client: reqwest::Client,
}

impl Notifier {
    /// Creates a notifier. `None` disables all outgoing messages.
    #[must_use]
    pub fn new(webhook_url: Option<String>) -> Self {
        Self {
            webhook_url,
            client: reqwest::Client::new(),
        }
    }

    /// A notifier that never sends anything, for tests.
    #[must_use]
    pub fn disabled() -> Self {
        Self::new(None)
    }

    /// Announces a closed sale.
    pub fn sale_closed(&self, seller_name: &str, revenue: f64) {
        self.send(format!(
            "{seller_name} har genomfört en försäljning på {revenue:.0} SEK 🎉"
        ));
    }

    /// Announces a level-up.
    pub fn level_up(&self, seller_name: &str, new_level: i32) {
        self.send(format!(
            "{seller_name} har precis gått upp till level {new_level} 🎉"
        ));
    }

    /// Sends a pre-formatted message, such as the morning digest.
    pub fn message(&self, text: String) {
        self.send(text);
    }

    fn send(&self, text: String) {
        let Some(url) = self.webhook_url.clone() else {
            debug!("webhook not configured, dropping announcement");
            return;
        };
        let client = self.client.clone();
        tokio::spawn(async move {
            let result = client.post(&url).json(&json!({ "text": text })).send().await;
            match result {
                Ok(response) if !response.status().is_success() => {
                    warn!(status = %response.status(), "webhook rejected announcement");
                }
                Ok(_) => {}
                Err(e) => warn!(error = %e, "failed to deliver announcement"),
            }
        });
    }
}
