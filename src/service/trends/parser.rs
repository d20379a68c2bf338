//! Google Trends RSS extraction.
//!
//! Both entry points walk the document once with a namespace-aware reader.
//! Trend-specific children (`approx_traffic`, `news_item`, ...) are matched by
//! namespace URI, so any prefix bound to [`TRENDS_NS`] works.

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use thiserror::Error;

use crate::models::{NewsRef, TrendItem};

/// Namespace URI of the trend-specific RSS fields.
pub const TRENDS_NS: &[u8] = b"https://trends.google.com/trending/rss";

/// The document is not well-formed XML. Carries the reader's diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed XML at byte {position}: {message}")]
pub struct ParseError {
    pub position: u64,
    pub message: String,
}

/// Parse a trends feed into topics, in document order.
pub fn parse(raw: impl AsRef<[u8]>) -> Result<Vec<TrendItem>, ParseError> {
    let drafts = walk(raw.as_ref(), Fields::Full)?;
    Ok(drafts
        .into_iter()
        .map(|d| TrendItem {
            title: d.title,
            traffic: d.traffic,
            news: d.news,
        })
        .collect())
}

/// Legacy mode: only the item titles. Items without a `<title>` are skipped.
pub fn parse_titles_only(raw: impl AsRef<[u8]>) -> Result<Vec<String>, ParseError> {
    let drafts = walk(raw.as_ref(), Fields::TitleOnly)?;
    Ok(drafts.into_iter().filter_map(|d| d.title).collect())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Fields {
    TitleOnly,
    Full,
}

#[derive(Debug, Default)]
struct Draft {
    title: Option<String>,
    traffic: Option<String>,
    news: Vec<NewsRef>,
}

#[derive(Debug, Clone, Copy)]
enum Slot {
    Title,
    Traffic,
    NewsTitle,
    NewsSource,
    NewsUrl,
}

enum Frame {
    Item(usize),
    NewsItem(usize),
    Field {
        item: usize,
        slot: Slot,
        text: String,
        /// Set once a child element opens; only the leading text counts.
        sealed: bool,
    },
    Other,
}

/// Namespace an element name resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scope {
    Plain,
    Trends,
    Foreign,
}

fn walk(raw: &[u8], fields: Fields) -> Result<Vec<Draft>, ParseError> {
    let mut reader = NsReader::from_reader(raw);
    let mut buf = Vec::new();

    let mut drafts: Vec<Draft> = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut root_seen = false;

    loop {
        let (scope, event) = match reader.read_resolved_event_into(&mut buf) {
            Ok((ns, event)) => {
                let scope = match ns {
                    ResolveResult::Unbound => Some(Scope::Plain),
                    ResolveResult::Bound(Namespace(uri)) if uri == TRENDS_NS => {
                        Some(Scope::Trends)
                    }
                    ResolveResult::Bound(_) => Some(Scope::Foreign),
                    ResolveResult::Unknown(_) => None,
                };
                (scope, event)
            }
            Err(e) => {
                return Err(ParseError {
                    position: reader.error_position() as u64,
                    message: e.to_string(),
                })
            }
        };

        match event {
            Event::Start(e) => {
                let scope = check_element(&e, scope, &reader)?;
                check_single_root(&stack, &mut root_seen, &reader)?;
                seal_parent(&mut stack);
                let frame = open_frame(&e, scope, stack.last(), &mut drafts, fields);
                stack.push(frame);
            }
            Event::Empty(e) => {
                let scope = check_element(&e, scope, &reader)?;
                check_single_root(&stack, &mut root_seen, &reader)?;
                seal_parent(&mut stack);
                let frame = open_frame(&e, scope, stack.last(), &mut drafts, fields);
                close_frame(frame, &mut drafts);
            }
            Event::End(_) => match stack.pop() {
                Some(frame) => close_frame(frame, &mut drafts),
                None => return Err(malformed(&reader, "unexpected closing tag")),
            },
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| malformed(&reader, e))?;
                match stack.last_mut() {
                    Some(Frame::Field {
                        text: acc,
                        sealed: false,
                        ..
                    }) => acc.push_str(&text),
                    Some(_) => {}
                    None if text.trim().is_empty() => {}
                    None => return Err(malformed(&reader, "text outside the root element")),
                }
            }
            Event::CData(c) => match stack.last_mut() {
                Some(Frame::Field {
                    text,
                    sealed: false,
                    ..
                }) => text.push_str(&String::from_utf8_lossy(c.as_ref())),
                Some(_) => {}
                None => return Err(malformed(&reader, "CDATA outside the root element")),
            },
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if !stack.is_empty() {
        return Err(malformed(&reader, "unexpected end of document: unclosed element"));
    }
    if !root_seen {
        return Err(malformed(&reader, "no element found"));
    }

    Ok(drafts)
}

fn open_frame(
    e: &BytesStart<'_>,
    scope: Scope,
    parent: Option<&Frame>,
    drafts: &mut Vec<Draft>,
    fields: Fields,
) -> Frame {
    let local = e.local_name();
    let local = local.as_ref();

    if scope == Scope::Plain && local == b"item" {
        drafts.push(Draft::default());
        return Frame::Item(drafts.len() - 1);
    }

    let full = fields == Fields::Full;
    match parent {
        Some(Frame::Item(item)) => {
            let item = *item;
            match (scope, local) {
                (Scope::Plain, b"title") => field(item, Slot::Title),
                (Scope::Trends, b"approx_traffic") if full => field(item, Slot::Traffic),
                (Scope::Trends, b"news_item") if full => {
                    drafts[item].news.push(NewsRef {
                        title: None,
                        source: None,
                        url: None,
                    });
                    Frame::NewsItem(item)
                }
                _ => Frame::Other,
            }
        }
        Some(Frame::NewsItem(item)) if scope == Scope::Trends => match local {
            b"news_item_title" => field(*item, Slot::NewsTitle),
            b"news_item_source" => field(*item, Slot::NewsSource),
            b"news_item_url" => field(*item, Slot::NewsUrl),
            _ => Frame::Other,
        },
        _ => Frame::Other,
    }
}

fn field(item: usize, slot: Slot) -> Frame {
    Frame::Field {
        item,
        slot,
        text: String::new(),
        sealed: false,
    }
}

fn seal_parent(stack: &mut [Frame]) {
    if let Some(Frame::Field { sealed, .. }) = stack.last_mut() {
        *sealed = true;
    }
}

/// Commit a finished field. The first occurrence of a field wins.
fn close_frame(frame: Frame, drafts: &mut [Draft]) {
    let Frame::Field {
        item, slot, text, ..
    } = frame
    else {
        return;
    };
    let Some(draft) = drafts.get_mut(item) else {
        return;
    };

    let target = match slot {
        Slot::Title => &mut draft.title,
        Slot::Traffic => &mut draft.traffic,
        Slot::NewsTitle | Slot::NewsSource | Slot::NewsUrl => {
            let Some(news) = draft.news.last_mut() else {
                return;
            };
            match slot {
                Slot::NewsTitle => &mut news.title,
                Slot::NewsSource => &mut news.source,
                _ => &mut news.url,
            }
        }
    };

    if target.is_none() {
        *target = Some(match slot {
            Slot::Title => text.trim().to_string(),
            _ => text,
        });
    }
}

/// Well-formedness checks the reader leaves to the caller: name syntax,
/// attribute syntax and uniqueness, and undeclared prefixes.
fn check_element<R>(
    e: &BytesStart<'_>,
    scope: Option<Scope>,
    reader: &NsReader<R>,
) -> Result<Scope, ParseError> {
    let name = std::str::from_utf8(e.name().as_ref())
        .map_err(|err| malformed(reader, err))?
        .to_string();
    let valid_name = match name.split_once(':') {
        Some((prefix, local)) => is_name(prefix) && is_name(local),
        None => is_name(&name),
    };
    if !valid_name {
        return Err(malformed(reader, format!("invalid element name {name:?}")));
    }

    let scope =
        scope.ok_or_else(|| malformed(reader, format!("unbound prefix in element <{name}>")))?;

    for attr in e.attributes().with_checks(true) {
        let attr = attr.map_err(|err| malformed(reader, err))?;
        if let (ResolveResult::Unknown(_), _) = reader.resolve_attribute(attr.key) {
            return Err(malformed(
                reader,
                format!("unbound prefix in attribute of <{name}>"),
            ));
        }
    }

    Ok(scope)
}

/// XML `Name` without colons: a NameStartChar followed by NameChars.
fn is_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if is_name_start_char(c) => chars.all(is_name_char),
        _ => false,
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

fn check_single_root<R>(
    stack: &[Frame],
    root_seen: &mut bool,
    reader: &NsReader<R>,
) -> Result<(), ParseError> {
    if stack.is_empty() {
        if *root_seen {
            return Err(malformed(reader, "junk after document element"));
        }
        *root_seen = true;
    }
    Ok(())
}

fn malformed<R>(reader: &NsReader<R>, message: impl ToString) -> ParseError {
    ParseError {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}
