//! Task detection: keyword tables and the classifier.

pub mod classifier;
pub mod keywords;

pub use classifier::{Priority, PriorityLevel, Task, classify, classify_at};
