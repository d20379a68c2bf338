use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use chrono_tz::Asia::Taipei;
use serde::{Deserialize, Serialize};

use super::error::{AppError, AppResult};
use super::AppState;
use crate::models::{CalendarEvent, TrendItem};
use crate::service::automation::send_trends_report;

/// Number of topics echoed back by `/fetch-trends`.
const RESPONSE_TOPICS: usize = 10;

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub service: &'static str,
    pub endpoints: [&'static str; 3],
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub status: &'static str,
    pub topics_count: usize,
    pub topics: Vec<TrendItem>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub year: Option<i32>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub status: &'static str,
    pub year: i32,
    pub events_count: usize,
    pub gcs_url: String,
    pub events: Vec<CalendarEvent>,
}

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        service: "Google Trends Taiwan Fetcher",
        endpoints: ["/fetch-trends", "/health", "/national-calendar"],
    })
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "healthy" })
}

/// Fetch the feed, post it to the chat webhook and echo the first topics.
pub async fn fetch_trends(State(state): State<AppState>) -> AppResult<Json<TrendsResponse>> {
    let mut topics = send_trends_report(&state.trends, state.notifier.as_deref()).await?;
    let topics_count = topics.len();
    topics.truncate(RESPONSE_TOPICS);

    Ok(Json(TrendsResponse {
        status: "success",
        topics_count,
        topics,
    }))
}

/// Refresh `<year>.json` in storage from the government dataset.
pub async fn national_calendar(
    State(state): State<AppState>,
    Query(query): Query<CalendarQuery>,
) -> AppResult<Json<CalendarResponse>> {
    let year = query
        .year
        .unwrap_or_else(|| Utc::now().with_timezone(&Taipei).year());
    if !(1900..=9999).contains(&year) {
        return Err(AppError::BadRequest(format!("year out of range: {year}")));
    }

    let store = state
        .store
        .as_deref()
        .ok_or_else(|| AppError::Unavailable("calendar storage is not configured".to_string()))?;

    let sync = state.calendar.sync_year(store, year).await?;
    tracing::info!("Calendar {} synced to {}", year, sync.url);

    Ok(Json(CalendarResponse {
        status: "success",
        year,
        events_count: sync.snapshot.events_count,
        gcs_url: sync.url,
        events: sync.snapshot.events,
    }))
}
