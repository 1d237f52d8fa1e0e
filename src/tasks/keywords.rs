//! Static keyword tables for task detection.
//!
//! All entries are lowercase. Matching is plain substring containment on
//! lowercased text, so an entry inside a longer unrelated word still
//! matches (`"due"` matches `"residue"`).

/// Urgency markers. Any hit → high priority.
pub const URGENT_KEYWORDS: &[&str] = &[
    "至急",
    "緊急",
    "急ぎ",
    "大至急",
    "今すぐ",
    "すぐに",
    "urgent",
    "asap",
    "immediately",
];

/// Deadline phrases. Any hit (and no urgent hit) → medium priority.
pub const DEADLINE_KEYWORDS: &[&str] = &[
    "締切",
    "締め切り",
    "期限",
    "期日",
    "までに",
    "deadline",
    "due",
];

/// Politeness/request phrases.
pub const REQUEST_KEYWORDS: &[&str] = &[
    "お願いします",
    "お願いいたします",
    "お願い致します",
    "ください",
    "下さい",
    "いただけますか",
    "いただけますでしょうか",
    "頂けますか",
    "please",
    "could you",
    "can you",
    "would you",
];

/// Question phrases.
pub const QUESTION_KEYWORDS: &[&str] = &[
    "?",
    "？",
    "でしょうか",
    "いかがですか",
    "いかがでしょう",
];

/// Approval/review phrases.
pub const APPROVAL_KEYWORDS: &[&str] = &[
    "承認",
    "確認",
    "決裁",
    "review",
    "approve",
    "approval",
    "sign off",
];

/// Generic task words.
pub const TASK_WORDS: &[&str] = &[
    "対応",
    "依頼",
    "提出",
    "作業",
    "返信",
    "task",
    "todo",
    "to do",
    "action required",
];

/// Every table that makes an email a task.
pub const TASK_KEYWORD_TABLES: &[&[&str]] = &[
    REQUEST_KEYWORDS,
    DEADLINE_KEYWORDS,
    QUESTION_KEYWORDS,
    URGENT_KEYWORDS,
    APPROVAL_KEYWORDS,
    TASK_WORDS,
];

/// Iterate over every task keyword across all tables.
pub fn all_task_keywords() -> impl Iterator<Item = &'static str> {
    TASK_KEYWORD_TABLES.iter().flat_map(|table| table.iter().copied())
}
