//! Mail ingestion: provider adapter trait, normalization, batch fetch.

pub mod demo;
pub mod ingest;
pub mod normalizer;
pub mod types;

pub use demo::DemoMailSource;
pub use ingest::Ingestor;
pub use normalizer::EmailNormalizer;
pub use types::{Email, MailSource, MessageSummary, RawHeader, RawMessage};
