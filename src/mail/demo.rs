//! In-memory mail source serving a fixed demo inbox.
//!
//! Used by the console binary when no provider is wired up, and by tests
//! to simulate partial failures.

use std::collections::HashSet;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::FetchError;
use crate::mail::types::{MailSource, MessageSummary, RawMessage};

/// Mail source backed by a fixed list of raw messages.
pub struct DemoMailSource {
    messages: Vec<RawMessage>,
    failing_ids: Mutex<HashSet<String>>,
    fail_listing: AtomicBool,
    detail_delay: Option<Duration>,
}

impl DemoMailSource {
    /// Source serving exactly `messages`, in order.
    pub fn new(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            failing_ids: Mutex::new(HashSet::new()),
            fail_listing: AtomicBool::new(false),
            detail_delay: None,
        }
    }

    /// Source serving the built-in demo inbox.
    pub fn with_demo_inbox() -> Self {
        Self::new(demo_inbox())
    }

    /// Builder: sleep before answering each detail fetch.
    pub fn with_detail_delay(mut self, delay: Duration) -> Self {
        self.detail_delay = Some(delay);
        self
    }

    /// Make detail fetches for `id` fail.
    pub fn fail_message(&self, id: impl Into<String>) {
        if let Ok(mut ids) = self.failing_ids.lock() {
            ids.insert(id.into());
        }
    }

    /// Make the listing call fail (or succeed again).
    pub fn set_listing_fails(&self, fails: bool) {
        self.fail_listing.store(fails, Ordering::Relaxed);
    }

    fn is_failing(&self, id: &str) -> bool {
        self.failing_ids
            .lock()
            .map(|ids| ids.contains(id))
            .unwrap_or(false)
    }
}

#[async_trait]
impl MailSource for DemoMailSource {
    fn name(&self) -> &str {
        "demo"
    }

    async fn list_messages(
        &self,
        query: &str,
        max_results: usize,
    ) -> Result<Vec<MessageSummary>, FetchError> {
        if self.fail_listing.load(Ordering::Relaxed) {
            return Err(FetchError::ListFailed {
                source_name: self.name().to_string(),
                reason: "listing disabled".into(),
            });
        }
        debug!(query, max_results, "Listing demo inbox");
        Ok(self
            .messages
            .iter()
            .take(max_results)
            .map(|m| MessageSummary::new(m.id.clone()))
            .collect())
    }

    async fn get_message(&self, id: &str) -> Result<RawMessage, FetchError> {
        if let Some(delay) = self.detail_delay {
            tokio::time::sleep(delay).await;
        }
        if self.is_failing(id) {
            return Err(FetchError::MessageFailed {
                id: id.to_string(),
                reason: "simulated failure".into(),
            });
        }
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| FetchError::MessageFailed {
                id: id.to_string(),
                reason: "not found".into(),
            })
    }
}

/// The built-in demo inbox.
pub fn demo_inbox() -> Vec<RawMessage> {
    vec![
        RawMessage::new("demo-1")
            .with_header("Subject", "プロジェクトの進捗について")
            .with_header("From", "Yamada Taro <yamada@example.com>")
            .with_header("Date", "Wed, 12 Jun 2024 05:30:00 +0000")
            .with_snippet("プロジェクトの進捗についてご報告いたします。"),
        RawMessage::new("demo-2")
            .with_header("Subject", "会議の件")
            .with_header("From", "Tanaka Hanako <tanaka@example.com>")
            .with_header("Date", "Wed, 12 Jun 2024 04:15:00 +0000")
            .with_snippet("明日の会議について確認してください"),
        RawMessage::new("demo-3")
            .with_header("Subject", "システムメンテナンスのお知らせ")
            .with_header("From", "admin@example.com")
            .with_header("Date", "Wed, 12 Jun 2024 01:00:00 +0000")
            .with_snippet("システムメンテナンスを実施いたします。"),
        RawMessage::new("demo-4")
            .with_header("Subject", "至急対応")
            .with_header("From", "\"Suzuki Ichiro\" <suzuki@example.com>")
            .with_header("Date", "Tue, 11 Jun 2024 23:40:00 +0000")
            .with_snippet("至急ご確認ください"),
        RawMessage::new("demo-5")
            .with_header("Subject", "見積書の提出期限")
            .with_header("From", "Sato Jiro <sato@example.com>")
            .with_header("Date", "Tue, 11 Jun 2024 08:00:00 +0000")
            .with_snippet("金曜日までに見積書を提出してください。"),
        RawMessage::new("demo-6")
            .with_header("Subject", "Quarterly report")
            .with_header("From", "Alice Smith <alice@example.com>")
            .with_header("Date", "Mon, 10 Jun 2024 16:20:00 +0000")
            .with_snippet("Could you review the draft before the deadline on Friday?"),
    ]
}
