use std::time::Duration as StdDuration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::{info, warn};

use crate::models::TrendItem;

pub mod parser;

pub use parser::{parse, parse_titles_only, ParseError, TRENDS_NS};

pub const DEFAULT_FEED_URL: &str = "https://trends.google.com/trending/rss?geo=TW";
pub const DEFAULT_LIMIT: usize = 20;

const BROWSER_UA: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
);

#[derive(Debug, thiserror::Error)]
pub enum TrendsError {
    #[error("Failed to fetch RSS feed: {0}")]
    Fetch(String),
    #[error("Failed to parse RSS feed: {0}")]
    Parse(#[from] ParseError),
}

/// Fetches the trending RSS feed and turns it into topics.
pub struct TrendsService {
    client: reqwest::Client,
    feed_url: String,
    limit: usize,
}

impl TrendsService {
    pub fn new(
        feed_url: impl Into<String>,
        limit: usize,
        timeout: StdDuration,
    ) -> Result<Self, TrendsError> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(BROWSER_UA));
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/rss+xml,application/xml;q=0.9,*/*;q=0.8"),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("zh-TW,zh;q=0.9,en-US;q=0.8,en;q=0.7"),
        );

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| TrendsError::Fetch(format!("failed to build client: {e}")))?;

        Ok(Self {
            client,
            feed_url: feed_url.into(),
            limit,
        })
    }

    /// Download the raw feed document.
    pub async fn fetch_raw(&self) -> Result<Vec<u8>, TrendsError> {
        let resp = self.client.get(&self.feed_url).send().await.map_err(|e| {
            warn!("RSS feed request failed: {}", e);
            TrendsError::Fetch(e.to_string())
        })?;

        let status = resp.status();
        info!("RSS feed responded with status: {}", status);
        if !status.is_success() {
            return Err(TrendsError::Fetch(format!("feed returned status {status}")));
        }

        let body = resp.bytes().await.map_err(|e| {
            warn!("Failed to read RSS feed body: {}", e);
            TrendsError::Fetch(format!("body read failed: {e}"))
        })?;

        Ok(body.to_vec())
    }

    /// Fetch, parse and cap the feed to the configured number of topics.
    pub async fn fetch_trending(&self) -> Result<Vec<TrendItem>, TrendsError> {
        let raw = self.fetch_raw().await?;
        let mut items = parse(&raw).map_err(|e| {
            warn!("Failed to parse RSS XML: {}", e);
            TrendsError::Parse(e)
        })?;

        if items.is_empty() {
            warn!("No topics found in RSS feed");
        } else {
            info!("Found {} trending topics via RSS feed", items.len());
        }

        items.truncate(self.limit);
        Ok(items)
    }
}
