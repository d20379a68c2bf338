use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};
use chrono_tz::{Asia::Taipei, Tz};
use once_cell::sync::Lazy;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::models::TrendItem;
use crate::service::notify::{Notifier, NotifyError};
use crate::service::trends::{TrendsError, TrendsService};

/// Minutes after the configured time during which a missed tick may still post.
const POST_WINDOW_MINUTES: i64 = 5;

static LAST_TRENDS_POST_DATE: Lazy<Mutex<Option<NaiveDate>>> = Lazy::new(|| Mutex::new(None));

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Trends(#[from] TrendsError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// Fetch the current topics and post them. Returns what was posted.
pub async fn send_trends_report(
    trends: &TrendsService,
    notifier: Option<&dyn Notifier>,
) -> Result<Vec<TrendItem>, ReportError> {
    let notifier = notifier.ok_or(NotifyError::NotConfigured)?;
    let items = trends.fetch_trending().await?;
    notifier.send_trends(&items).await?;
    Ok(items)
}

/// Spawn the daily trends poster (every day at `post_time`, Asia/Taipei).
pub fn spawn_trends_poster(
    trends: Arc<TrendsService>,
    notifier: Arc<dyn Notifier>,
    post_time: NaiveTime,
) -> JoinHandle<()> {
    info!("Starting daily trends poster at {} Asia/Taipei", post_time.format("%H:%M"));

    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tokio::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let now = Utc::now().with_timezone(&Taipei);
            let outcome = post_if_due(
                now,
                post_time,
                &LAST_TRENDS_POST_DATE,
                &trends,
                notifier.as_ref(),
            )
            .await;
            match outcome {
                Some(Ok(items)) => info!("Daily trends report posted ({} topics)", items.len()),
                Some(Err(e)) => warn!("daily trends poster iteration failed: {e}"),
                None => {}
            }
        }
    })
}

/// Post when due. `last_post` only advances after a successful send, so a
/// failed attempt is retried on the next tick inside the window.
/// Returns `None` when nothing was due.
pub async fn post_if_due(
    now: DateTime<Tz>,
    post_time: NaiveTime,
    last_post: &Mutex<Option<NaiveDate>>,
    trends: &TrendsService,
    notifier: &dyn Notifier,
) -> Option<Result<Vec<TrendItem>, ReportError>> {
    let mut last = last_post.lock().await;
    if !is_due(now, post_time, *last) {
        return None;
    }
    let result = send_trends_report(trends, Some(notifier)).await;
    if result.is_ok() {
        *last = Some(now.date_naive());
    }
    Some(result)
}

/// Due when `now` falls in the posting window and nothing was posted today.
pub fn is_due(now: DateTime<Tz>, post_time: NaiveTime, last: Option<NaiveDate>) -> bool {
    if last == Some(now.date_naive()) {
        return false;
    }
    let elapsed = now.time().signed_duration_since(post_time);
    elapsed >= TimeDelta::zero() && elapsed < TimeDelta::minutes(POST_WINDOW_MINUTES)
}
