use std::sync::Arc;
use std::time::Duration as StdDuration;

use serenity::async_trait;
use tracing::info;

use crate::models::TrendItem;

pub mod discord;
pub mod slack;
pub mod summary;

pub use discord::DiscordNotifier;
pub use slack::SlackNotifier;

pub const REPORT_HEADER: &str = "🔥 Taiwan Google Trends";

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("chat webhook URL is not set (CHAT_WEBHOOK_URL or SLACK_WEBHOOK_URL)")]
    NotConfigured,
    #[error("webhook request failed: {0}")]
    Http(String),
    #[error("webhook returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("discord webhook error: {0}")]
    Discord(#[from] serenity::Error),
}

/// Delivers a rendered trends summary to a chat service.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_trends(&self, items: &[TrendItem]) -> Result<(), NotifyError>;
}

/// Pick the notifier matching the webhook URL: Discord webhooks go through
/// serenity, everything else is treated as a Slack incoming webhook.
pub fn from_webhook_url(
    url: &str,
    timeout: StdDuration,
) -> Result<Arc<dyn Notifier>, NotifyError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(NotifyError::NotConfigured);
    }

    if discord::is_discord_webhook(url) {
        info!("Using Discord webhook notifier");
        Ok(Arc::new(DiscordNotifier::new(url)))
    } else {
        info!("Using Slack webhook notifier");
        Ok(Arc::new(SlackNotifier::new(url, timeout)?))
    }
}
