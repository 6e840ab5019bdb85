//! Slack notifications
//!
//! Fire-and-forget: a missing webhook disables notifications entirely and
//! a delivery failure never fails the command that triggered it.

use gridflow_config::Settings;
use tracing::{debug, warn};

pub async fn post(settings: &Settings, message: &str) {
    let Some(webhook) = &settings.slack_webhook else {
        debug!("Slack webhook not configured, skipping notification");
        return;
    };

    let payload = serde_json::json!({ "text": message });
    match reqwest::Client::new()
        .post(webhook)
        .json(&payload)
        .send()
        .await
    {
        Ok(response) if response.status().is_success() => {}
        Ok(response) => {
            warn!(status = %response.status(), "Slack notification rejected");
        }
        Err(e) => {
            warn!(error = %e, "Slack notification failed");
        }
    }
}
