use crate::models::{NewsRef, TrendItem};

pub const NO_TOPICS: &str = "No trending topics found.";
const UNTITLED: &str = "(untitled)";

/// Markup flavour of the target chat service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Markup {
    /// Slack mrkdwn: `<url|label>` links, `& < >` escaped.
    Slack,
    /// Discord markdown: `[label](url)` links.
    Discord,
}

impl Markup {
    /// Per-block character limit of the target.
    pub fn block_limit(self) -> usize {
        match self {
            Markup::Slack => 3000,
            Markup::Discord => 4096,
        }
    }

    fn escape(self, text: &str) -> String {
        match self {
            Markup::Slack => text
                .replace('&', "&amp;")
                .replace('<', "&lt;")
                .replace('>', "&gt;"),
            Markup::Discord => text.replace('[', "\\[").replace(']', "\\]"),
        }
    }

    fn link(self, label: &str, url: &str) -> String {
        match self {
            Markup::Slack => format!("<{}|{}>", url, self.escape(label)),
            Markup::Discord => format!("[{}]({})", self.escape(label), url),
        }
    }
}

/// Render one topic: a header line, then one bullet per news entry.
pub fn render_topic(index: usize, item: &TrendItem, markup: Markup) -> String {
    let title = markup.escape(item.title.as_deref().unwrap_or(UNTITLED));
    let mut header = match markup {
        Markup::Slack => format!("# {index} {title}"),
        Markup::Discord => format!("**{index}. {title}**"),
    };
    if let Some(traffic) = item.traffic.as_deref() {
        header.push_str(&format!(" ({})", markup.escape(traffic)));
    }

    if item.news.is_empty() {
        return format!("{header} - N/A\n");
    }

    let mut out = header;
    out.push('\n');
    for news in &item.news {
        out.push_str(&render_news(news, markup));
        out.push('\n');
    }
    out
}

fn render_news(news: &NewsRef, markup: Markup) -> String {
    let label = news
        .title
        .as_deref()
        .or(news.url.as_deref())
        .unwrap_or(UNTITLED);
    let mut line = match news.url.as_deref() {
        Some(url) => format!("- {}", markup.link(label, url)),
        None => format!("- {}", markup.escape(label)),
    };
    if let Some(source) = news.source.as_deref() {
        line.push_str(&format!(" · {}", markup.escape(source)));
    }
    line
}

/// Render all topics and pack them into chunks no longer than the block limit.
///
/// Topics are never split across chunks; a topic that is longer than the limit
/// on its own is cut and ends with `…`.
pub fn render_sections(items: &[TrendItem], markup: Markup) -> Vec<String> {
    if items.is_empty() {
        return vec![NO_TOPICS.to_string()];
    }

    let limit = markup.block_limit();
    let mut chunks = Vec::new();
    let mut current = String::new();

    for (index, item) in items.iter().enumerate() {
        let topic = clip(render_topic(index + 1, item, markup), limit);
        // blank line between topics
        let extra = if current.is_empty() { 0 } else { 1 };
        if !current.is_empty() && char_len(&current) + extra + char_len(&topic) > limit {
            chunks.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push('\n');
        }
        current.push_str(&topic);
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn clip(text: String, limit: usize) -> String {
    if char_len(&text) <= limit {
        return text;
    }
    let mut clipped: String = text.chars().take(limit.saturating_sub(1)).collect();
    clipped.push('…');
    clipped
}
