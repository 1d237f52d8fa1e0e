//! Configuration types.

use std::time::Duration;

use chrono::{FixedOffset, Local, Offset};

use crate::error::ConfigError;

/// Inbox viewer configuration.
#[derive(Debug, Clone)]
pub struct InboxConfig {
    /// Maximum number of message summaries listed per fetch.
    pub max_results: usize,
    /// Provider-side search query for the listing call.
    pub mailbox_query: String,
    /// Deadline for a single message detail fetch.
    pub detail_timeout: Duration,
    /// Offset used when rendering dates for display.
    pub display_offset: FixedOffset,
}

impl Default for InboxConfig {
    fn default() -> Self {
        Self {
            max_results: 10,
            mailbox_query: "in:inbox".to_string(),
            detail_timeout: Duration::from_secs(10),
            display_offset: Local::now().offset().fix(),
        }
    }
}

impl InboxConfig {
    /// Build a config from `INBOX_*` environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup("INBOX_MAX_RESULTS") {
            let max_results: usize = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "INBOX_MAX_RESULTS".into(),
                message: format!("expected a positive integer, got {raw:?}"),
            })?;
            if max_results == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "INBOX_MAX_RESULTS".into(),
                    message: "must be greater than zero".into(),
                });
            }
            config.max_results = max_results;
        }

        if let Some(query) = lookup("INBOX_QUERY") {
            config.mailbox_query = query;
        }

        if let Some(raw) = lookup("INBOX_DETAIL_TIMEOUT_SECS") {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "INBOX_DETAIL_TIMEOUT_SECS".into(),
                message: format!("expected seconds, got {raw:?}"),
            })?;
            if secs == 0 {
                return Err(ConfigError::InvalidValue {
                    key: "INBOX_DETAIL_TIMEOUT_SECS".into(),
                    message: "must be greater than zero".into(),
                });
            }
            config.detail_timeout = Duration::from_secs(secs);
        }

        if let Some(raw) = lookup("INBOX_UTC_OFFSET") {
            config.display_offset = parse_offset(&raw)?;
        }

        Ok(config)
    }
}

/// Parse a UTC offset such as `+09:00` or `-05:30`.
pub fn parse_offset(raw: &str) -> Result<FixedOffset, ConfigError> {
    raw.trim()
        .parse::<FixedOffset>()
        .map_err(|e| ConfigError::InvalidValue {
            key: "INBOX_UTC_OFFSET".into(),
            message: format!("{raw:?} is not a UTC offset: {e}"),
        })
}
