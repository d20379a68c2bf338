use std::sync::Arc;

use axum::routing::get;
use axum::Router;

use crate::service::calendar::CalendarService;
use crate::service::notify::Notifier;
use crate::service::storage::BlobStore;
use crate::service::trends::TrendsService;

pub mod error;
pub mod handlers;

pub use error::{AppError, AppResult};

#[derive(Clone)]
pub struct AppState {
    pub trends: Arc<TrendsService>,
    pub notifier: Option<Arc<dyn Notifier>>,
    pub calendar: Arc<CalendarService>,
    pub store: Option<Arc<dyn BlobStore>>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route(
            "/fetch-trends",
            get(handlers::fetch_trends).post(handlers::fetch_trends),
        )
        .route("/national-calendar", get(handlers::national_calendar))
        .with_state(state)
}
