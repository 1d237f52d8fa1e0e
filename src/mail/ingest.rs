//! Batch ingestion — list summaries, fan out detail fetches, normalize.
//!
//! Detail fetches run concurrently and the batch waits for all of them to
//! settle. A failed or timed-out detail fetch drops that message; only a
//! failed listing call fails the batch.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::config::InboxConfig;
use crate::error::{FetchError, Result};
use crate::mail::normalizer::EmailNormalizer;
use crate::mail::types::{Email, MailSource, RawMessage};

/// Pulls a batch of messages from a `MailSource` and normalizes them.
pub struct Ingestor {
    source: Arc<dyn MailSource>,
    normalizer: EmailNormalizer,
    query: String,
    max_results: usize,
    detail_timeout: Duration,
}

impl Ingestor {
    pub fn new(source: Arc<dyn MailSource>, config: &InboxConfig) -> Self {
        Self {
            source,
            normalizer: EmailNormalizer::new(config.display_offset),
            query: config.mailbox_query.clone(),
            max_results: config.max_results,
            detail_timeout: config.detail_timeout,
        }
    }

    /// Fetch and normalize one batch.
    ///
    /// The result keeps listing order, minus any message whose detail fetch
    /// failed. An empty `Vec` is a normal result.
    pub async fn fetch_emails(&self) -> Result<Vec<Email>> {
        let summaries = self
            .source
            .list_messages(&self.query, self.max_results)
            .await?;

        if summaries.is_empty() {
            info!(source = self.source.name(), "Mailbox listing returned no messages");
            return Ok(Vec::new());
        }

        let total = summaries.len();
        debug!(source = self.source.name(), total, "Fetching message details");

        let futures: Vec<_> = summaries
            .iter()
            .map(|summary| self.fetch_detail(&summary.id))
            .collect();

        let emails: Vec<Email> = join_all(futures)
            .await
            .into_iter()
            .filter_map(|result| match result {
                Ok(raw) => Some(self.normalizer.normalize(&raw)),
                Err(e) => {
                    warn!(error = %e, "Dropping message from batch");
                    None
                }
            })
            .collect();

        info!(
            source = self.source.name(),
            fetched = emails.len(),
            total,
            "Fetch batch complete"
        );

        Ok(emails)
    }

    async fn fetch_detail(&self, id: &str) -> std::result::Result<RawMessage, FetchError> {
        match tokio::time::timeout(self.detail_timeout, self.source.get_message(id)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout {
                id: id.to_string(),
                timeout: self.detail_timeout,
            }),
        }
    }
}
