//! Keyword-substring task classifier.
//!
//! Runs on every email collection change and fully replaces the previous
//! task list. No NLP: a task is any email whose lowercased
//! `subject + " " + snippet` contains a task keyword.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::mail::types::Email;
use crate::tasks::keywords::{self, DEADLINE_KEYWORDS, URGENT_KEYWORDS};

// ── Priority ────────────────────────────────────────────────────────

/// Priority tier of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityLevel {
    High,
    Medium,
    Low,
}

impl PriorityLevel {
    /// Sort weight; higher sorts first.
    pub fn weight(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
        }
    }

    /// Short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "高",
            Self::Medium => "中",
            Self::Low => "低",
        }
    }

    /// Color hint for the renderer.
    pub fn display_hint(&self) -> &'static str {
        match self {
            Self::High => "red",
            Self::Medium => "amber",
            Self::Low => "green",
        }
    }
}

impl std::fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{s}")
    }
}

/// Priority attached to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    pub level: PriorityLevel,
    pub label: String,
    pub display_hint: String,
}

impl From<PriorityLevel> for Priority {
    fn from(level: PriorityLevel) -> Self {
        Self {
            level,
            label: level.label().to_string(),
            display_hint: level.display_hint().to_string(),
        }
    }
}

// ── Task ────────────────────────────────────────────────────────────

/// An email flagged as an actionable request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub subject: String,
    pub from: String,
    pub date: String,
    pub snippet: String,
    pub priority: Priority,
    /// When the classifier derived this task.
    pub extracted_at: DateTime<Utc>,
}

impl Task {
    fn from_email(email: &Email, level: PriorityLevel, extracted_at: DateTime<Utc>) -> Self {
        Self {
            id: email.id.clone(),
            subject: email.subject.clone(),
            from: email.from.clone(),
            date: email.date.clone(),
            snippet: email.snippet.clone(),
            priority: level.into(),
            extracted_at,
        }
    }

    pub fn level(&self) -> PriorityLevel {
        self.priority.level
    }
}

// ── Classification ──────────────────────────────────────────────────

/// Lowercased text the classifier scans.
fn classification_text(email: &Email) -> String {
    format!("{} {}", email.subject, email.snippet).to_lowercase()
}

fn contains_any(text: &str, table: &[&str]) -> bool {
    table.iter().any(|keyword| text.contains(keyword))
}

/// Whether lowercased `text` contains any task keyword.
pub fn is_task_text(text: &str) -> bool {
    keywords::all_task_keywords().any(|keyword| text.contains(keyword))
}

/// Priority tier for lowercased `text`. Urgent is checked before deadline.
pub fn priority_for_text(text: &str) -> PriorityLevel {
    if contains_any(text, URGENT_KEYWORDS) {
        PriorityLevel::High
    } else if contains_any(text, DEADLINE_KEYWORDS) {
        PriorityLevel::Medium
    } else {
        PriorityLevel::Low
    }
}

/// Classify `emails` into tasks, stamping them with the current time.
pub fn classify(emails: &[Email]) -> Vec<Task> {
    classify_at(emails, Utc::now())
}

/// Classify `emails` into tasks stamped with `extracted_at`.
///
/// Output is sorted by priority weight descending. The sort is stable, so
/// equal-priority tasks keep input order.
pub fn classify_at(emails: &[Email], extracted_at: DateTime<Utc>) -> Vec<Task> {
    let mut tasks: Vec<Task> = emails
        .iter()
        .filter_map(|email| {
            let text = classification_text(email);
            if !is_task_text(&text) {
                return None;
            }
            let level = priority_for_text(&text);
            debug!(id = %email.id, priority = %level, "Email classified as task");
            Some(Task::from_email(email, level, extracted_at))
        })
        .collect();

    tasks.sort_by(|a, b| b.level().weight().cmp(&a.level().weight()));
    tasks
}
