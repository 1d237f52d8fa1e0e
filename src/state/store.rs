//! Inbox state store — the single mutation funnel for view state.
//!
//! All changes go through `InboxStore::apply()`. Each event mutates the
//! owned state, recomputes the full view, and publishes it as one
//! `Arc<InboxView>` over a watch channel, so observers never see a
//! half-applied change.
//!
//! Overlapping fetches resolve last-started-wins: `begin_fetch()` hands out
//! a `FetchTicket`, and results carrying an older ticket are discarded.

use std::collections::BTreeSet;
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::mail::ingest::Ingestor;
use crate::mail::types::Email;
use crate::state::view::{FetchStatus, FilterState, InboxView, PriorityFilter, compute_view};
use crate::tasks::{self, Task};

/// Identifies one fetch. Only the most recently issued ticket is honored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    generation: u64,
}

/// State change accepted by `InboxStore::apply()`.
#[derive(Debug, Clone)]
pub enum StateEvent {
    /// A fetch finished; replaces the email collection wholesale.
    FetchCompleted { ticket: FetchTicket, emails: Vec<Email> },
    /// A fetch failed as a whole; previous emails are kept.
    FetchFailed { ticket: FetchTicket, reason: String },
    SetQuery(String),
    SetPriorityFilter(PriorityFilter),
    SetShowCompleted(bool),
    /// Flip completion of a task id.
    ToggleCompletion(String),
    /// Clear the completion set only.
    ResetCompletion,
    /// Drop all data and restore default filters.
    SignOut,
}

impl StateEvent {
    /// Short label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FetchCompleted { .. } => "fetch_completed",
            Self::FetchFailed { .. } => "fetch_failed",
            Self::SetQuery(_) => "set_query",
            Self::SetPriorityFilter(_) => "set_priority_filter",
            Self::SetShowCompleted(_) => "set_show_completed",
            Self::ToggleCompletion(_) => "toggle_completion",
            Self::ResetCompletion => "reset_completion",
            Self::SignOut => "sign_out",
        }
    }
}

/// Owner of emails, tasks, completion set and filter state.
pub struct InboxStore {
    emails: Vec<Email>,
    tasks: Vec<Task>,
    completed: BTreeSet<String>,
    filter: FilterState,
    fetch_status: FetchStatus,
    fetch_generation: u64,
    tx: watch::Sender<Arc<InboxView>>,
}

impl Default for InboxStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InboxStore {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Arc::new(InboxView::default()));
        let store = Self {
            emails: Vec::new(),
            tasks: Vec::new(),
            completed: BTreeSet::new(),
            filter: FilterState::default(),
            fetch_status: FetchStatus::Idle,
            fetch_generation: 0,
            tx,
        };
        store.publish();
        store
    }

    /// Subscribe to view snapshots. The receiver always holds the latest.
    pub fn subscribe(&self) -> watch::Receiver<Arc<InboxView>> {
        self.tx.subscribe()
    }

    /// Current view snapshot.
    pub fn view(&self) -> Arc<InboxView> {
        self.tx.borrow().clone()
    }

    /// Mark a fetch as started and return its ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.fetch_generation += 1;
        self.fetch_status = FetchStatus::Loading;
        debug!(generation = self.fetch_generation, "Fetch started");
        self.publish();
        FetchTicket {
            generation: self.fetch_generation,
        }
    }

    /// Apply one event and return the recomputed view.
    pub fn apply(&mut self, event: StateEvent) -> Arc<InboxView> {
        let label = event.label();

        match event {
            StateEvent::FetchCompleted { ticket, emails } => {
                if !self.is_current(ticket) {
                    return self.view();
                }
                self.tasks = tasks::classify(&emails);
                info!(
                    emails = emails.len(),
                    tasks = self.tasks.len(),
                    "Email collection replaced"
                );
                self.emails = emails;
                self.fetch_status = FetchStatus::Idle;
            }
            StateEvent::FetchFailed { ticket, reason } => {
                if !self.is_current(ticket) {
                    return self.view();
                }
                warn!(reason = %reason, "Fetch failed");
                self.fetch_status = FetchStatus::Failed { reason };
            }
            StateEvent::SetQuery(query) => {
                self.filter.query = query;
            }
            StateEvent::SetPriorityFilter(priority_filter) => {
                self.filter.priority_filter = priority_filter;
            }
            StateEvent::SetShowCompleted(show) => {
                self.filter.show_completed = show;
            }
            StateEvent::ToggleCompletion(id) => {
                if !self.completed.remove(&id) {
                    self.completed.insert(id);
                }
            }
            StateEvent::ResetCompletion => {
                self.completed.clear();
            }
            StateEvent::SignOut => {
                // Invalidate any in-flight fetch.
                self.fetch_generation += 1;
                self.emails.clear();
                self.tasks.clear();
                self.completed.clear();
                self.filter = FilterState::default();
                self.fetch_status = FetchStatus::Idle;
                info!("Signed out, inbox state cleared");
            }
        }

        debug!(event = label, "State event applied");
        self.publish()
    }

    /// Finish a fetch started with `begin_fetch()`.
    pub fn complete_fetch(
        &mut self,
        ticket: FetchTicket,
        result: Result<Vec<Email>>,
    ) -> Arc<InboxView> {
        match result {
            Ok(emails) => self.apply(StateEvent::FetchCompleted { ticket, emails }),
            Err(e) => self.apply(StateEvent::FetchFailed {
                ticket,
                reason: e.to_string(),
            }),
        }
    }

    /// Run one full fetch through `ingestor` and apply the result.
    pub async fn refresh(&mut self, ingestor: &Ingestor) -> Arc<InboxView> {
        let ticket = self.begin_fetch();
        let result = ingestor.fetch_emails().await;
        self.complete_fetch(ticket, result)
    }

    pub fn set_query(&mut self, query: impl Into<String>) -> Arc<InboxView> {
        self.apply(StateEvent::SetQuery(query.into()))
    }

    pub fn set_priority_filter(&mut self, priority_filter: PriorityFilter) -> Arc<InboxView> {
        self.apply(StateEvent::SetPriorityFilter(priority_filter))
    }

    pub fn set_show_completed(&mut self, show: bool) -> Arc<InboxView> {
        self.apply(StateEvent::SetShowCompleted(show))
    }

    pub fn toggle_completion(&mut self, id: impl Into<String>) -> Arc<InboxView> {
        self.apply(StateEvent::ToggleCompletion(id.into()))
    }

    pub fn reset_completion(&mut self) -> Arc<InboxView> {
        self.apply(StateEvent::ResetCompletion)
    }

    pub fn sign_out(&mut self) -> Arc<InboxView> {
        self.apply(StateEvent::SignOut)
    }

    fn is_current(&self, ticket: FetchTicket) -> bool {
        if ticket.generation == self.fetch_generation {
            return true;
        }
        warn!(
            ticket = ticket.generation,
            current = self.fetch_generation,
            "Discarding result of superseded fetch"
        );
        false
    }

    fn publish(&self) -> Arc<InboxView> {
        let view = Arc::new(compute_view(
            &self.emails,
            &self.tasks,
            &self.completed,
            &self.filter,
            &self.fetch_status,
        ));
        self.tx.send_replace(Arc::clone(&view));
        view
    }
}
