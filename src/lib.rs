//! Inbox Tasks — email-to-task classification and search/filter core.

pub mod config;
pub mod console;
pub mod error;
pub mod mail;
pub mod search;
pub mod state;
pub mod tasks;
