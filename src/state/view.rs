//! Filter state and the derived view snapshot handed to renderers.

use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::mail::types::Email;
use crate::search::{self, HighlightedText};
use crate::tasks::{PriorityLevel, Task};

// ── Filter state ────────────────────────────────────────────────────

/// Priority restriction applied to the task list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorityFilter {
    #[default]
    All,
    High,
    Medium,
    Low,
}

impl PriorityFilter {
    pub fn matches(&self, level: PriorityLevel) -> bool {
        match self {
            Self::All => true,
            Self::High => level == PriorityLevel::High,
            Self::Medium => level == PriorityLevel::Medium,
            Self::Low => level == PriorityLevel::Low,
        }
    }
}

impl std::fmt::Display for PriorityFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::All => "all",
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PriorityFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(Self::All),
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            other => Err(format!(
                "unknown priority filter '{other}' (expected all, high, medium or low)"
            )),
        }
    }
}

/// User-controlled filter settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub query: String,
    pub priority_filter: PriorityFilter,
    pub show_completed: bool,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            query: String::new(),
            priority_filter: PriorityFilter::All,
            show_completed: true,
        }
    }
}

// ── Status ──────────────────────────────────────────────────────────

/// Progress of the most recent fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FetchStatus {
    #[default]
    Idle,
    Loading,
    Failed { reason: String },
}

/// Why a list renders no rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyState {
    /// The underlying collection is empty.
    Empty,
    /// Items exist but the query or filters exclude all of them.
    NoMatches,
}

impl EmptyState {
    fn for_lists(total: usize, visible: usize) -> Option<Self> {
        if total == 0 {
            Some(Self::Empty)
        } else if visible == 0 {
            Some(Self::NoMatches)
        } else {
            None
        }
    }
}

/// Task totals for the header line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
}

// ── View ────────────────────────────────────────────────────────────

/// Immutable snapshot of everything a renderer needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InboxView {
    pub emails: Vec<Email>,
    pub tasks: Vec<Task>,
    pub visible_emails: Vec<Email>,
    pub visible_tasks: Vec<Task>,
    pub filter: FilterState,
    pub completed_ids: Vec<String>,
    pub task_counts: TaskCounts,
    pub fetch_status: FetchStatus,
    pub email_empty_state: Option<EmptyState>,
    pub task_empty_state: Option<EmptyState>,
}

impl InboxView {
    pub fn is_completed(&self, id: &str) -> bool {
        self.completed_ids.iter().any(|c| c == id)
    }

    /// Highlight `text` with the current query.
    pub fn highlight(&self, text: &str) -> HighlightedText {
        search::highlight(text, &self.filter.query)
    }
}

/// Apply the priority and completion filters to already query-filtered tasks.
pub fn secondary_filter(
    tasks: Vec<Task>,
    priority_filter: PriorityFilter,
    show_completed: bool,
    completed: &BTreeSet<String>,
) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| priority_filter.matches(task.level()))
        .filter(|task| show_completed || !completed.contains(&task.id))
        .collect()
}

/// Derive a full view from the current state. Pure.
pub fn compute_view(
    emails: &[Email],
    tasks: &[Task],
    completed: &BTreeSet<String>,
    filter: &FilterState,
    fetch_status: &FetchStatus,
) -> InboxView {
    let visible_emails = search::filter_by_query(emails, &filter.query);
    let visible_tasks = secondary_filter(
        search::filter_by_query(tasks, &filter.query),
        filter.priority_filter,
        filter.show_completed,
        completed,
    );

    let completed_tasks = tasks.iter().filter(|t| completed.contains(&t.id)).count();
    let task_counts = TaskCounts {
        total: tasks.len(),
        completed: completed_tasks,
        pending: tasks.len() - completed_tasks,
    };

    InboxView {
        email_empty_state: EmptyState::for_lists(emails.len(), visible_emails.len()),
        task_empty_state: EmptyState::for_lists(tasks.len(), visible_tasks.len()),
        emails: emails.to_vec(),
        tasks: tasks.to_vec(),
        visible_emails,
        visible_tasks,
        filter: filter.clone(),
        completed_ids: completed.iter().cloned().collect(),
        task_counts,
        fetch_status: fetch_status.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    use crate::tasks::Priority;

    fn make_task(id: &str, level: PriorityLevel, subject: &str) -> Task {
        Task {
            id: id.into(),
            subject: subject.into(),
            from: "Sender".into(),
            date: "2024/6/12 14:30:00".into(),
            snippet: String::new(),
            priority: Priority::from(level),
            extracted_at: Utc::now(),
        }
    }

    fn task_ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn priority_filter_parses_case_insensitively() {
        assert_eq!("HIGH".parse::<PriorityFilter>(), Ok(PriorityFilter::High));
        assert_eq!(" all ".parse::<PriorityFilter>(), Ok(PriorityFilter::All));
        assert!("urgent".parse::<PriorityFilter>().is_err());
    }

    #[test]
    fn priority_filter_all_matches_everything() {
        for level in [PriorityLevel::High, PriorityLevel::Medium, PriorityLevel::Low] {
            assert!(PriorityFilter::All.matches(level));
        }
        assert!(!PriorityFilter::Low.matches(PriorityLevel::High));
    }

    #[test]
    fn filter_state_defaults() {
        let filter = FilterState::default();
        assert_eq!(filter.query, "");
        assert_eq!(filter.priority_filter, PriorityFilter::All);
        assert!(filter.show_completed);
    }

    #[test]
    fn secondary_filter_by_priority() {
        let tasks = vec![
            make_task("h", PriorityLevel::High, "a"),
            make_task("m", PriorityLevel::Medium, "b"),
            make_task("l", PriorityLevel::Low, "c"),
        ];
        let out = secondary_filter(tasks, PriorityFilter::Medium, true, &BTreeSet::new());
        assert_eq!(task_ids(&out), vec!["m"]);
    }

    #[test]
    fn secondary_filter_hides_completed() {
        let tasks = vec![
            make_task("h", PriorityLevel::High, "a"),
            make_task("l", PriorityLevel::Low, "c"),
        ];
        let completed: BTreeSet<String> = ["h".to_string()].into();
        let hidden = secondary_filter(tasks.clone(), PriorityFilter::All, false, &completed);
        assert_eq!(task_ids(&hidden), vec!["l"]);
        let shown = secondary_filter(tasks, PriorityFilter::All, true, &completed);
        assert_eq!(task_ids(&shown), vec!["h", "l"]);
    }

    #[test]
    fn compute_view_empty_states() {
        let empty = compute_view(
            &[],
            &[],
            &BTreeSet::new(),
            &FilterState::default(),
            &FetchStatus::Idle,
        );
        assert_eq!(empty.email_empty_state, Some(EmptyState::Empty));
        assert_eq!(empty.task_empty_state, Some(EmptyState::Empty));

        let tasks = vec![make_task("h", PriorityLevel::High, "report")];
        let filter = FilterState {
            query: "absent".into(),
            ..Default::default()
        };
        let view = compute_view(&[], &tasks, &BTreeSet::new(), &filter, &FetchStatus::Idle);
        assert_eq!(view.task_empty_state, Some(EmptyState::NoMatches));
    }

    #[test]
    fn compute_view_counts_ignore_stale_completed_ids() {
        let tasks = vec![
            make_task("a", PriorityLevel::High, "x"),
            make_task("b", PriorityLevel::Low, "y"),
        ];
        let completed: BTreeSet<String> = ["a".to_string(), "gone".to_string()].into();
        let view = compute_view(
            &[],
            &tasks,
            &completed,
            &FilterState::default(),
            &FetchStatus::Idle,
        );
        assert_eq!(
            view.task_counts,
            TaskCounts {
                total: 2,
                completed: 1,
                pending: 1
            }
        );
        assert!(view.is_completed("a"));
        assert!(!view.is_completed("b"));
    }

    #[test]
    fn fetch_status_serializes_tagged() {
        let json = serde_json::to_value(FetchStatus::Failed {
            reason: "offline".into(),
        })
        .unwrap();
        assert_eq!(json["state"], "failed");
        assert_eq!(json["reason"], "offline");
    }
}
