//! Outbound mail dispatch through an HTTP mail relay
//!
//! Delivery is strictly best-effort: failures are logged and never surface
//! to callers, and sends happen on a spawned task so they cannot delay a
//! donation response.

use serde_json::json;

/// Mail relay client
#[derive(Clone)]
pub struct Mailer {
    client: reqwest::Client,
    relay_url: Option<String>,
    from: String,
}

impl Mailer {
    pub fn new(relay_url: Option<String>, from: String) -> Self {
        if relay_url.is_none() {
            tracing::warn!("MAIL_RELAY_URL not set, outbound mail is disabled");
        }

        Self {
            client: reqwest::Client::new(),
            relay_url,
            from,
        }
    }

    /// Send a message through the relay. Errors are logged, never returned.
    pub async fn send(&self, to: &str, subject: &str, text: &str, html: Option<&str>) {
        let Some(relay_url) = &self.relay_url else {
            tracing::debug!(to = %to, subject = %subject, "Mail disabled, skipping send");
            return;
        };

        let payload = json!({
            "from": self.from,
            "to": to,
            "subject": subject,
            "text": text,
            "html": html,
        });

        match self.client.post(relay_url).json(&payload).send().await {
            Ok(response) if response.status().is_success() => {
                tracing::info!(to = %to, subject = %subject, "Mail dispatched");
            }
            Ok(response) => {
                tracing::warn!(
                    to = %to,
                    status = %response.status(),
                    "Mail relay rejected message"
                );
            }
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "Failed to reach mail relay");
            }
        }
    }

    /// Fire-and-forget send on a background task
    pub fn spawn_send(&self, to: String, subject: String, text: String, html: String) {
        let mailer = self.clone();
        tokio::spawn(async move {
            mailer.send(&to, &subject, &text, Some(&html)).await;
        });
    }
}

/// Donation confirmation message bodies
pub fn donation_confirmation(
    donor_name: &str,
    amount: i64,
    campaign_name: &str,
) -> (String, String, String) {
    let subject = "Thank You for Your Donation".to_string();
    let text = format!(
        "Dear {donor_name},\n\nThank you for your generous donation of ${amount} to the \
         {campaign_name} campaign. Your support is greatly appreciated.\n\nBest regards,\n\
         PalHope Team"
    );
    let html = format!(
        "<p>Dear {donor_name},</p><p>Thank you for your generous donation of ${amount} to the \
         {campaign_name} campaign. Your support is greatly appreciated.</p>\
         <p>Best regards,<br>PalHope Team</p>"
    );
    (subject, text, html)
}
