//! Mail types shared by the ingestion shell and the pipeline.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::FetchError;

// ── Raw provider records ────────────────────────────────────────────

/// One entry from the provider's message listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSummary {
    /// Provider message ID.
    pub id: String,
}

impl MessageSummary {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// A single `name: value` header as returned by the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawHeader {
    pub name: String,
    pub value: String,
}

impl RawHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Message detail as returned by the provider — only the fields the
/// normalizer consumes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawMessage {
    /// Provider message ID.
    pub id: String,
    /// Header list in provider order.
    #[serde(default)]
    pub headers: Vec<RawHeader>,
    /// Short body preview.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snippet: Option<String>,
}

impl RawMessage {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Builder: append a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(RawHeader::new(name, value));
        self
    }

    /// Builder: set the snippet.
    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.snippet = Some(snippet.into());
        self
    }

    /// Case-insensitive header lookup. The first matching header wins.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}

// ── Canonical email ─────────────────────────────────────────────────

/// Canonical email record produced by the normalizer. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    /// Stable provider ID.
    pub id: String,
    /// Subject line, or a placeholder.
    pub subject: String,
    /// Sender display name, or the raw `From` value.
    pub from: String,
    /// Display-formatted date-time, or a placeholder.
    pub date: String,
    /// Body preview, or a placeholder.
    pub snippet: String,
}

// ── Mail source trait ───────────────────────────────────────────────

/// Mail provider adapter — pure I/O, no business logic.
///
/// Normalization, classification and filtering happen downstream of the
/// adapter; it only lists and fetches raw records.
#[async_trait]
pub trait MailSource: Send + Sync {
    /// Source name for logging (e.g. "gmail", "demo").
    fn name(&self) -> &str;

    /// List recent message summaries, newest first.
    async fn list_messages(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<MessageSummary>, FetchError>;

    /// Fetch the detail record for one message.
    async fn get_message(&self, id: &str) -> Result<RawMessage, FetchError>;
}
