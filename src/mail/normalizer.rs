//! Raw provider message → canonical `Email`.
//!
//! Every field degrades to a fixed placeholder instead of failing, so a
//! malformed message never aborts a batch.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use regex::Regex;

use crate::mail::types::{Email, RawMessage};

pub const NO_SUBJECT: &str = "件名なし";
pub const UNKNOWN_SENDER: &str = "送信者不明";
pub const UNKNOWN_DATE: &str = "日時不明";
pub const NO_PREVIEW: &str = "プレビューなし";

/// Display format, matching the `ja-JP` locale rendering (`2024/6/12 9:05:00`).
const DISPLAY_FORMAT: &str = "%Y/%-m/%-d %-H:%M:%S";

/// Naive formats accepted after RFC 2822 / RFC 3339 fail.
const NAIVE_FORMATS: &[&str] = &["%Y/%m/%d %H:%M:%S", "%Y-%m-%d %H:%M:%S"];

static NAME_ADDR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.*?)\s*<[^<>]*>\s*$").unwrap());

/// Converts raw provider messages into `Email` records.
#[derive(Debug, Clone)]
pub struct EmailNormalizer {
    display_offset: FixedOffset,
}

impl EmailNormalizer {
    pub fn new(display_offset: FixedOffset) -> Self {
        Self { display_offset }
    }

    pub fn normalize(&self, raw: &RawMessage) -> Email {
        let subject = raw
            .header("Subject")
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_SUBJECT)
            .to_string();

        let from = match raw.header("From").filter(|s| !s.is_empty()) {
            Some(value) => sender_display_name(value),
            None => UNKNOWN_SENDER.to_string(),
        };

        let date = raw
            .header("Date")
            .and_then(|value| format_date(value, &self.display_offset))
            .unwrap_or_else(|| UNKNOWN_DATE.to_string());

        let snippet = raw
            .snippet
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(NO_PREVIEW)
            .to_string();

        Email {
            id: raw.id.clone(),
            subject,
            from,
            date,
            snippet,
        }
    }
}

/// Extract the display name from a `Name <addr>` sender.
///
/// Surrounding quotes are stripped. Falls back to the raw value when there
/// is no bracketed address or the name part is empty.
pub fn sender_display_name(raw: &str) -> String {
    let Some(caps) = NAME_ADDR.captures(raw) else {
        return raw.to_string();
    };
    let name = caps
        .get(1)
        .map(|m| m.as_str())
        .unwrap_or_default()
        .trim_matches(|c: char| c == '"' || c == '\'' || c.is_whitespace());

    if name.is_empty() {
        raw.to_string()
    } else {
        name.to_string()
    }
}

/// Parse a `Date` header and render it in `offset`. Returns `None` when the
/// value cannot be parsed.
pub fn format_date(raw: &str, offset: &FixedOffset) -> Option<String> {
    parse_date(raw, offset).map(|dt| {
        dt.with_timezone(offset)
            .format(DISPLAY_FORMAT)
            .to_string()
    })
}

fn parse_date(raw: &str, offset: &FixedOffset) -> Option<DateTime<FixedOffset>> {
    let trimmed = strip_trailing_comment(raw.trim());
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt);
    }
    NAIVE_FORMATS.iter().find_map(|fmt| {
        NaiveDateTime::parse_from_str(trimmed, fmt)
            .ok()
            .and_then(|naive| offset.from_local_datetime(&naive).single())
    })
}

/// Drop a trailing `(UTC)`-style comment from an RFC 2822 date.
fn strip_trailing_comment(value: &str) -> &str {
    if value.ends_with(')') {
        if let Some(start) = value.rfind('(') {
            return value[..start].trim_end();
        }
    }
    value
}
