use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// A row of the government office calendar. Missing columns are empty strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    #[serde(default)]
    pub date: String, // YYYYMMDD
    #[serde(default)]
    pub year: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub isholiday: String,
    #[serde(default)]
    pub holidaycategory: String,
    #[serde(default)]
    pub description: String,
}

/// Blob body written to `<year>.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSnapshot {
    pub year: i32,
    pub events_count: usize,
    pub events: Vec<CalendarEvent>,
    pub updated_at: DateTime<FixedOffset>,
}
