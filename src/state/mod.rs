//! Derived UI state: filter settings, completion tracking, view snapshots.

pub mod store;
pub mod view;

pub use store::{FetchTicket, InboxStore, StateEvent};
pub use view::{
    EmptyState, FetchStatus, FilterState, InboxView, PriorityFilter, TaskCounts, compute_view,
    secondary_filter,
};
