use std::time::Duration as StdDuration;

use chrono::Utc;
use chrono_tz::Asia::Taipei;
use tracing::{info, warn};

use crate::models::{CalendarEvent, CalendarSnapshot};
use crate::service::storage::{BlobStore, StorageError};

/// New Taipei City government office calendar (data.gov.tw dataset 123662).
pub const DEFAULT_CSV_URL: &str =
    "https://data.ntpc.gov.tw/api/datasets/308dcd75-6434-45bc-a95f-584da4fed251/csv/file";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

#[derive(Debug, thiserror::Error)]
pub enum CalendarError {
    #[error("Failed to fetch national calendar: {0}")]
    Fetch(String),
    #[error("Failed to parse calendar data: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to encode calendar snapshot: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("Calendar upload failed: {0}")]
    Storage(#[from] StorageError),
}

/// Result of one calendar sync.
#[derive(Debug, Clone)]
pub struct CalendarSync {
    pub snapshot: CalendarSnapshot,
    pub url: String,
}

pub struct CalendarService {
    client: reqwest::Client,
    csv_url: String,
}

impl CalendarService {
    pub fn new(
        csv_url: impl Into<String>,
        timeout: StdDuration,
        accept_invalid_certs: bool,
    ) -> Result<Self, CalendarError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36")
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(|e| CalendarError::Fetch(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            csv_url: csv_url.into(),
        })
    }

    /// Download the dataset and keep the rows of `year`.
    pub async fn fetch_events(&self, year: i32) -> Result<Vec<CalendarEvent>, CalendarError> {
        info!("Fetching national calendar data for year {}", year);

        let resp = self.client.get(&self.csv_url).send().await.map_err(|e| {
            warn!("Failed to fetch national calendar data: {}", e);
            CalendarError::Fetch(e.to_string())
        })?;

        let status = resp.status();
        if !status.is_success() {
            warn!("Calendar dataset returned error status {}", status);
            return Err(CalendarError::Fetch(format!("dataset returned status {status}")));
        }

        let raw = resp
            .bytes()
            .await
            .map_err(|e| CalendarError::Fetch(format!("body read failed: {e}")))?;

        let events = parse_calendar_csv(&raw, year)?;
        info!(
            "Successfully fetched {} calendar events for {}",
            events.len(),
            year
        );
        Ok(events)
    }

    /// Fetch `year`, wrap it in a snapshot and upload it as `<year>.json`.
    pub async fn sync_year(
        &self,
        store: &dyn BlobStore,
        year: i32,
    ) -> Result<CalendarSync, CalendarError> {
        let events = self.fetch_events(year).await?;
        let snapshot = CalendarSnapshot {
            year,
            events_count: events.len(),
            events,
            updated_at: Utc::now().with_timezone(&Taipei).fixed_offset(),
        };

        let body = serde_json::to_vec_pretty(&snapshot)?;
        let url = store.put_json(&blob_name(year), body).await?;
        Ok(CalendarSync { snapshot, url })
    }
}

pub fn blob_name(year: i32) -> String {
    format!("{year}.json")
}

/// Read the dataset CSV (header row first, optional BOM) and keep the rows
/// whose `date` starts with `year`.
pub fn parse_calendar_csv(raw: &[u8], year: i32) -> Result<Vec<CalendarEvent>, CalendarError> {
    let raw = raw.strip_prefix(UTF8_BOM).unwrap_or(raw);
    let prefix = year.to_string();

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(raw);

    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|h| h == name);
    let columns = [
        column("date"),
        column("year"),
        column("name"),
        column("isholiday"),
        column("holidaycategory"),
        column("description"),
    ];

    let mut events = Vec::new();
    for row in reader.records() {
        let record = row?;
        let [date, year, name, isholiday, holidaycategory, description] =
            columns.map(|idx| idx.and_then(|i| record.get(i)).unwrap_or("").to_string());
        if date.starts_with(&prefix) {
            events.push(CalendarEvent {
                date,
                year,
                name,
                isholiday,
                holidaycategory,
                description,
            });
        }
    }
    Ok(events)
}
