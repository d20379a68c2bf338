use serde::{Deserialize, Serialize};

/// One trending topic from the feed. Absent fields stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendItem {
    pub title: Option<String>,
    pub traffic: Option<String>, // e.g. "50,000+"
    pub news: Vec<NewsRef>,
}

/// A news article attached to a trending topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsRef {
    pub title: Option<String>,
    pub source: Option<String>,
    pub url: Option<String>,
}
