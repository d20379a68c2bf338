use std::time::Duration as StdDuration;

use chrono::{DateTime, Utc};
use chrono_tz::{Asia::Taipei, Tz};
use serde_json::{json, Value};
use serenity::async_trait;
use tracing::{info, warn};

use crate::models::TrendItem;
use crate::service::notify::summary::{render_sections, Markup};
use crate::service::notify::{Notifier, NotifyError, REPORT_HEADER};

/// Posts Block Kit messages to a Slack incoming webhook.
pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: impl Into<String>, timeout: StdDuration) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NotifyError::Http(format!("failed to build client: {e}")))?;
        Ok(Self {
            client,
            webhook_url: webhook_url.into(),
        })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn send_trends(&self, items: &[TrendItem]) -> Result<(), NotifyError> {
        let payload = build_payload(items, Utc::now().with_timezone(&Taipei));

        let resp = self
            .client
            .post(&self.webhook_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                warn!("Slack webhook request failed: {}", e);
                NotifyError::Http(e.to_string())
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "unable to read body".to_string());
            warn!("Slack webhook returned error status {}: {}", status, body);
            return Err(NotifyError::Status {
                status: status.as_u16(),
                body,
            });
        }

        info!("Successfully sent {} topics to Slack", items.len());
        Ok(())
    }
}

/// Build the Block Kit payload for the given topics.
pub fn build_payload(items: &[TrendItem], now: DateTime<Tz>) -> Value {
    let mut blocks = vec![
        json!({
            "type": "header",
            "text": { "type": "plain_text", "text": REPORT_HEADER, "emoji": true }
        }),
        json!({
            "type": "context",
            "elements": [{
                "type": "plain_text",
                "text": format!("📅 {} (in 24 hours)", now.format("%Y-%m-%d %H:%M")),
                "emoji": true
            }]
        }),
        json!({ "type": "divider" }),
    ];

    for section in render_sections(items, Markup::Slack) {
        blocks.push(json!({
            "type": "context",
            "elements": [{ "type": "mrkdwn", "text": section }]
        }));
    }

    json!({ "blocks": blocks })
}
