use std::sync::Arc;

use chrono::Utc;
use chrono_tz::Asia::Taipei;
use serenity::all::{Colour, CreateEmbed, ExecuteWebhook, Http, Webhook};
use serenity::async_trait;
use tracing::info;

use crate::models::TrendItem;
use crate::service::notify::summary::{render_sections, Markup};
use crate::service::notify::{Notifier, NotifyError, REPORT_HEADER};

/// Executes a Discord webhook; one embed per rendered chunk.
pub struct DiscordNotifier {
    http: Arc<Http>,
    webhook_url: String,
}

impl DiscordNotifier {
    pub fn new(webhook_url: impl Into<String>) -> Self {
        // Webhook execution is authorized by the token embedded in the URL.
        Self {
            http: Arc::new(Http::new("")),
            webhook_url: webhook_url.into(),
        }
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send_trends(&self, items: &[TrendItem]) -> Result<(), NotifyError> {
        let webhook = Webhook::from_url(&self.http, &self.webhook_url).await?;
        let stamp = Utc::now()
            .with_timezone(&Taipei)
            .format("%Y-%m-%d %H:%M")
            .to_string();

        for builder in build_messages(items, &stamp) {
            webhook.execute(&self.http, false, builder).await?;
        }

        info!("Successfully sent {} topics to Discord", items.len());
        Ok(())
    }
}

/// One webhook message per rendered chunk, each carrying a single embed.
/// Only the first message has the report header as its content.
pub fn build_messages(items: &[TrendItem], stamp: &str) -> Vec<ExecuteWebhook> {
    render_sections(items, Markup::Discord)
        .into_iter()
        .enumerate()
        .map(|(idx, section)| {
            let embed = CreateEmbed::new()
                .colour(Colour::ORANGE)
                .description(section);
            let builder = ExecuteWebhook::new().embed(embed);
            if idx == 0 {
                builder.content(format!("**{REPORT_HEADER}**\n📅 {stamp} (in 24 hours)"))
            } else {
                builder
            }
        })
        .collect()
}

/// Whether the URL points at a Discord webhook.
pub fn is_discord_webhook(url: &str) -> bool {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    [
        "discord.com/api/webhooks/",
        "discordapp.com/api/webhooks/",
        "ptb.discord.com/api/webhooks/",
        "canary.discord.com/api/webhooks/",
    ]
    .iter()
    .any(|prefix| rest.starts_with(prefix))
}
