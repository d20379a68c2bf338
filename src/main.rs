use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tw_trends_bot::api::{create_router, AppState};
use tw_trends_bot::config::Config;
use tw_trends_bot::service::automation::spawn_trends_poster;
use tw_trends_bot::service::calendar::CalendarService;
use tw_trends_bot::service::notify;
use tw_trends_bot::service::storage;
use tw_trends_bot::service::trends::TrendsService;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .compact()
        .init();

    let config = Config::from_env()?;

    info!("Initializing TrendsService for {}", config.feed_url);
    let trends = Arc::new(TrendsService::new(
        config.feed_url.clone(),
        config.trends_limit,
        config.http_timeout,
    )?);

    let notifier = match config.webhook_url.as_deref() {
        Some(url) => Some(notify::from_webhook_url(url, config.http_timeout)?),
        None => {
            warn!("No chat webhook configured; /fetch-trends will report an error");
            None
        }
    };

    let calendar = Arc::new(CalendarService::new(
        config.calendar_csv_url.clone(),
        config.http_timeout,
        config.calendar_accept_invalid_certs,
    )?);

    info!("Initializing calendar storage (optional)...");
    let store = match storage::from_config(&config.storage, config.http_timeout).await {
        Ok(store) => {
            info!("Calendar storage ready ({})", config.storage.backend_name());
            Some(store)
        }
        Err(err) => {
            info!("Calendar storage disabled: {err}");
            None
        }
    };

    match (config.post_time, notifier.clone()) {
        (Some(post_time), Some(notifier)) => {
            spawn_trends_poster(trends.clone(), notifier, post_time);
        }
        (Some(_), None) => warn!("TRENDS_POST_TIME set but no webhook; daily poster not started"),
        (None, _) => info!("TRENDS_POST_TIME not set; daily poster not started"),
    }

    let app = create_router(AppState {
        trends,
        notifier,
        calendar,
        store,
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
        std::future::pending::<()>().await;
    }
    info!("Shutting down");
}
