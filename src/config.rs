use std::env;
use std::path::PathBuf;
use std::time::Duration as StdDuration;

use chrono::NaiveTime;
use thiserror::Error;

use crate::service::calendar::DEFAULT_CSV_URL;
use crate::service::storage::StorageConfig;
use crate::service::trends::{DEFAULT_FEED_URL, DEFAULT_LIMIT};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key} is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Service settings, read from the environment (and `.env`).
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub feed_url: String,
    pub trends_limit: usize,
    pub http_timeout: StdDuration,
    pub webhook_url: Option<String>,
    /// Daily post time in Asia/Taipei; the in-process poster is off when unset.
    pub post_time: Option<NaiveTime>,
    pub calendar_csv_url: String,
    pub calendar_accept_invalid_certs: bool,
    pub storage: StorageConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let port = parse_or(get("PORT"), "PORT", 8080u16)?;
        let trends_limit = parse_or(get("TRENDS_LIMIT"), "TRENDS_LIMIT", DEFAULT_LIMIT)?;
        let timeout_secs = parse_or(get("HTTP_TIMEOUT_SECS"), "HTTP_TIMEOUT_SECS", 30u64)?;
        if timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                key: "HTTP_TIMEOUT_SECS",
                reason: "must be greater than zero".to_string(),
            });
        }

        let post_time = get("TRENDS_POST_TIME")
            .map(|raw| {
                NaiveTime::parse_from_str(&raw, "%H:%M").map_err(|e| ConfigError::Invalid {
                    key: "TRENDS_POST_TIME",
                    reason: format!("expected HH:MM, got {raw:?}: {e}"),
                })
            })
            .transpose()?;

        let invalid_certs = get("CALENDAR_ACCEPT_INVALID_CERTS");
        let calendar_accept_invalid_certs = match invalid_certs.as_deref() {
            None | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => {
                return Err(ConfigError::Invalid {
                    key: "CALENDAR_ACCEPT_INVALID_CERTS",
                    reason: format!("expected true/false, got {other:?}"),
                })
            }
        };

        let storage = match get("STORAGE_BACKEND").as_deref().unwrap_or("gcs") {
            "gcs" => StorageConfig::Gcs {
                bucket: get("CALENDAR_BUCKET").or_else(|| {
                    get("GOOGLE_CLOUD_PROJECT").map(|project| format!("{project}-calendar-bucket"))
                }),
                access_token: get("GCS_ACCESS_TOKEN"),
            },
            "local" => StorageConfig::Local {
                dir: PathBuf::from(get("STORAGE_DIR").unwrap_or_else(|| "./calendar".to_string())),
            },
            "redis" => StorageConfig::Redis {
                url: get("REDIS_URL"),
            },
            other => {
                return Err(ConfigError::Invalid {
                    key: "STORAGE_BACKEND",
                    reason: format!("expected gcs, local or redis, got {other:?}"),
                })
            }
        };

        Ok(Self {
            port,
            feed_url: get("TRENDS_FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            trends_limit,
            http_timeout: StdDuration::from_secs(timeout_secs),
            webhook_url: get("CHAT_WEBHOOK_URL").or_else(|| get("SLACK_WEBHOOK_URL")),
            post_time,
            calendar_csv_url: get("CALENDAR_CSV_URL")
                .unwrap_or_else(|| DEFAULT_CSV_URL.to_string()),
            calendar_accept_invalid_certs,
            storage,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(v) => v.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("{v:?}: {e}"),
        }),
    }
}
