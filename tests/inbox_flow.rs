//! End-to-end tests: demo mail source → ingestion → classification →
//! store filters, through the public API only.

use std::sync::Arc;

use chrono::FixedOffset;

use inbox_tasks::config::InboxConfig;
use inbox_tasks::mail::{DemoMailSource, Ingestor, RawMessage};
use inbox_tasks::search::filter_by_query;
use inbox_tasks::state::{EmptyState, FetchStatus, InboxStore, PriorityFilter};
use inbox_tasks::tasks::PriorityLevel;

fn config() -> InboxConfig {
    InboxConfig {
        display_offset: FixedOffset::east_opt(9 * 3600).unwrap(),
        ..Default::default()
    }
}

fn ingestor_for(source: DemoMailSource) -> Ingestor {
    Ingestor::new(Arc::new(source), &config())
}

fn task_ids(store: &InboxStore) -> Vec<String> {
    store
        .view()
        .visible_tasks
        .iter()
        .map(|t| t.id.clone())
        .collect()
}

#[tokio::test]
async fn demo_inbox_produces_sorted_tasks() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();

    let view = store.refresh(&ingestor).await;

    assert_eq!(view.fetch_status, FetchStatus::Idle);
    assert_eq!(view.emails.len(), 6);
    assert_eq!(task_ids(&store), vec!["demo-4", "demo-5", "demo-6", "demo-2"]);

    let levels: Vec<PriorityLevel> = view.tasks.iter().map(|t| t.level()).collect();
    assert_eq!(
        levels,
        vec![
            PriorityLevel::High,
            PriorityLevel::Medium,
            PriorityLevel::Medium,
            PriorityLevel::Low
        ]
    );
    let weights: Vec<u8> = levels.iter().map(|l| l.weight()).collect();
    assert!(weights.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn sender_names_and_dates_are_normalized() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();
    let view = store.refresh(&ingestor).await;

    let first = &view.emails[0];
    assert_eq!(first.from, "Yamada Taro");
    assert_eq!(first.date, "2024/6/12 14:30:00");

    let quoted = view.emails.iter().find(|e| e.id == "demo-4").unwrap();
    assert_eq!(quoted.from, "Suzuki Ichiro");

    let bare = view.emails.iter().find(|e| e.id == "demo-3").unwrap();
    assert_eq!(bare.from, "admin@example.com");
}

#[tokio::test]
async fn partial_failure_still_renders_the_rest() {
    let source = DemoMailSource::with_demo_inbox();
    source.fail_message("demo-4");
    let ingestor = ingestor_for(source);
    let mut store = InboxStore::new();

    let view = store.refresh(&ingestor).await;

    assert_eq!(view.fetch_status, FetchStatus::Idle);
    assert_eq!(view.emails.len(), 5);
    assert_eq!(task_ids(&store), vec!["demo-5", "demo-6", "demo-2"]);
}

#[tokio::test]
async fn listing_failure_is_reported_and_keeps_old_inbox() {
    let source = Arc::new(DemoMailSource::with_demo_inbox());
    let ingestor = Ingestor::new(source.clone(), &config());
    let mut store = InboxStore::new();
    store.refresh(&ingestor).await;

    source.set_listing_fails(true);
    let view = store.refresh(&ingestor).await;

    assert!(matches!(view.fetch_status, FetchStatus::Failed { .. }));
    assert_eq!(view.emails.len(), 6);
}

#[tokio::test]
async fn empty_mailbox_is_not_an_error() {
    let ingestor = ingestor_for(DemoMailSource::new(Vec::new()));
    let mut store = InboxStore::new();
    let view = store.refresh(&ingestor).await;

    assert_eq!(view.fetch_status, FetchStatus::Idle);
    assert_eq!(view.email_empty_state, Some(EmptyState::Empty));
    assert_eq!(view.task_empty_state, Some(EmptyState::Empty));
}

#[tokio::test]
async fn search_drives_emails_and_tasks_together() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();
    store.refresh(&ingestor).await;

    let view = store.set_query("会議 明日");
    let email_ids: Vec<&str> = view.visible_emails.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(email_ids, vec!["demo-2"]);
    assert_eq!(task_ids(&store), vec!["demo-2"]);

    // Only one token present → excluded.
    let view = store.set_query("会議 来週");
    assert!(view.visible_emails.is_empty());
    assert_eq!(view.email_empty_state, Some(EmptyState::NoMatches));

    let view = store.set_query("");
    assert_eq!(view.visible_emails, view.emails);
}

#[tokio::test]
async fn query_results_are_subset_containing_every_token() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let emails = ingestor.fetch_emails().await.unwrap();

    for query in ["example", "ください", "the draft", "yamada 進捗", "review FRIDAY"] {
        let filtered = filter_by_query(&emails, query);
        for email in &filtered {
            assert!(emails.contains(email));
            let text = format!("{} {} {}", email.subject, email.from, email.snippet).to_lowercase();
            for token in query.to_lowercase().split_whitespace() {
                assert!(text.contains(token), "{query}: {} lacks {token}", email.id);
            }
        }
    }
}

#[tokio::test]
async fn completed_high_task_hidden_by_filters() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();
    store.refresh(&ingestor).await;

    store.toggle_completion("demo-4");
    store.set_priority_filter(PriorityFilter::High);
    let view = store.set_show_completed(false);

    assert!(view.visible_tasks.is_empty());
    assert!(!view.tasks.is_empty());

    let view = store.set_show_completed(true);
    assert_eq!(view.visible_tasks.len(), 1);
    assert!(view.is_completed("demo-4"));
}

#[tokio::test]
async fn completion_survives_refresh_and_clears_on_sign_out() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();
    store.refresh(&ingestor).await;
    store.toggle_completion("demo-5");

    let view = store.refresh(&ingestor).await;
    assert!(view.is_completed("demo-5"));

    store.set_query("至急");
    let view = store.sign_out();
    assert!(view.emails.is_empty());
    assert!(view.completed_ids.is_empty());
    assert_eq!(view.filter.query, "");
    assert_eq!(view.filter.priority_filter, PriorityFilter::All);
    assert!(view.filter.show_completed);
}

#[tokio::test]
async fn malformed_message_degrades_to_placeholders() {
    let source = DemoMailSource::new(vec![
        RawMessage::new("bare"),
        RawMessage::new("odd-date")
            .with_header("subject", "Please sign")
            .with_header("date", "yesterday-ish"),
    ]);
    let ingestor = ingestor_for(source);
    let emails = ingestor.fetch_emails().await.unwrap();

    assert_eq!(emails.len(), 2);
    assert_eq!(emails[0].subject, "件名なし");
    assert_eq!(emails[0].from, "送信者不明");
    assert_eq!(emails[0].snippet, "プレビューなし");
    assert_eq!(emails[1].subject, "Please sign");
    assert_eq!(emails[1].date, "日時不明");
}

#[tokio::test]
async fn observers_receive_each_snapshot() {
    let ingestor = ingestor_for(DemoMailSource::with_demo_inbox());
    let mut store = InboxStore::new();
    let mut rx = store.subscribe();

    store.refresh(&ingestor).await;
    assert!(rx.has_changed().unwrap());
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.emails.len(), 6);
    assert_eq!(snapshot.tasks.len(), 4);

    store.set_priority_filter(PriorityFilter::Medium);
    let snapshot = rx.borrow_and_update().clone();
    assert_eq!(snapshot.visible_tasks.len(), 2);
    assert_eq!(snapshot.filter.priority_filter, PriorityFilter::Medium);
}
