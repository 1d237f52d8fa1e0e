//! Free-text search over emails and tasks.
//!
//! A query is split on whitespace into lowercase tokens. An item matches
//! when every token occurs in its searchable text (`subject from snippet`).
//! There is no OR. An empty query matches everything.

use serde::Serialize;

use crate::mail::types::Email;
use crate::tasks::Task;

/// Records that can be filtered by a search query.
pub trait Searchable {
    /// `subject + " " + from + " " + snippet`.
    fn searchable_text(&self) -> String;
}

impl Searchable for Email {
    fn searchable_text(&self) -> String {
        format!("{} {} {}", self.subject, self.from, self.snippet)
    }
}

impl Searchable for Task {
    fn searchable_text(&self) -> String {
        format!("{} {} {}", self.subject, self.from, self.snippet)
    }
}

/// Lowercase one char at a time.
///
/// Unlike `str::to_lowercase` this ignores context (a word-final `Σ` stays
/// `σ`), so filtering and highlighting always agree on what matched.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(char::to_lowercase).collect()
}

/// Split a query into lowercase, non-empty tokens.
pub fn tokenize(query: &str) -> Vec<String> {
    fold_case(query)
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Whether `item` contains every token (AND semantics).
pub fn matches_tokens<T: Searchable>(item: &T, tokens: &[String]) -> bool {
    let text = fold_case(&item.searchable_text());
    tokens.iter().all(|token| text.contains(token.as_str()))
}

/// Items whose searchable text contains every query token, in input order.
pub fn filter_by_query<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    let tokens = tokenize(query);
    if tokens.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|item| matches_tokens(*item, &tokens))
        .cloned()
        .collect()
}

// ── Highlighting ────────────────────────────────────────────────────

/// A run of text, highlighted or not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
}

/// Text split into plain and highlighted runs.
///
/// Concatenating every segment's text reproduces the input exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HighlightedText {
    pub segments: Vec<Segment>,
}

impl HighlightedText {
    fn plain(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            segments: vec![Segment {
                text: text.to_string(),
                highlighted: false,
            }],
        }
    }

    /// Original text without markers.
    pub fn plain_text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    /// Whether any segment is highlighted.
    pub fn has_highlights(&self) -> bool {
        self.segments.iter().any(|s| s.highlighted)
    }

    /// Render with `open`/`close` around highlighted runs.
    pub fn render(&self, open: &str, close: &str) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            if segment.highlighted {
                out.push_str(open);
                out.push_str(&segment.text);
                out.push_str(close);
            } else {
                out.push_str(&segment.text);
            }
        }
        out
    }

    /// Render with `<mark>` tags.
    pub fn to_markup(&self) -> String {
        self.render("<mark>", "</mark>")
    }
}

/// Highlight every case-insensitive occurrence of every query token.
///
/// Overlapping matches are merged into a single highlighted run. Matches
/// that only touch stay separate runs.
pub fn highlight(text: &str, query: &str) -> HighlightedText {
    let tokens = tokenize(query);
    if tokens.is_empty() || text.is_empty() {
        return HighlightedText::plain(text);
    }

    let ranges = merge_ranges(match_ranges(text, &tokens));
    if ranges.is_empty() {
        return HighlightedText::plain(text);
    }

    let mut segments = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut cursor = 0;
    for (start, end) in ranges {
        if start > cursor {
            segments.push(Segment {
                text: text[cursor..start].to_string(),
                highlighted: false,
            });
        }
        segments.push(Segment {
            text: text[start..end].to_string(),
            highlighted: true,
        });
        cursor = end;
    }
    if cursor < text.len() {
        segments.push(Segment {
            text: text[cursor..].to_string(),
            highlighted: false,
        });
    }

    HighlightedText { segments }
}

/// Byte ranges in `text` where a token matches case-insensitively.
///
/// Matching walks char boundaries of the original text and compares the
/// lowercased tail, so ranges always land on valid boundaries even when
/// lowercasing changes byte lengths.
fn match_ranges(text: &str, tokens: &[String]) -> Vec<(usize, usize)> {
    let mut ranges = Vec::new();
    for token in tokens {
        let token_chars: Vec<char> = token.chars().collect();
        for (start, _) in text.char_indices() {
            if let Some(end) = match_at(text, start, &token_chars) {
                ranges.push((start, end));
            }
        }
    }
    ranges
}

/// If lowercased `text[start..]` begins with `token`, return the end byte
/// offset of the match in the original text.
fn match_at(text: &str, start: usize, token: &[char]) -> Option<usize> {
    let mut wanted = token.iter();
    let mut pending = wanted.next()?;
    for (offset, ch) in text[start..].char_indices() {
        for lower in ch.to_lowercase() {
            if lower != *pending {
                return None;
            }
            match wanted.next() {
                Some(next) => pending = next,
                None => return Some(start + offset + ch.len_utf8()),
            }
        }
    }
    None
}

fn merge_ranges(mut ranges: Vec<(usize, usize)>) -> Vec<(usize, usize)> {
    ranges.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }
    merged
}
