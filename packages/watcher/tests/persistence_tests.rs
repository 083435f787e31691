//! Round-trip and best-effort persistence tests: in-memory store via
//! the command surface, SQLite store against the trait contract.

mod common;

use common::{harness, restarted};
use watcher_core::kernel::{BaseStore, SqliteStore};

const CHAT: i64 = 5001;
const OTHER_CHAT: i64 = 5002;
const URL_A: &str = "https://www.kleinanzeigen.de/s-couch/k0";
const URL_B: &str = "https://www.kleinanzeigen.de/s-lamp/k0";

#[tokio::test]
async fn rehydration_restores_targets_and_filters_per_chat() {
    let h = harness();
    h.watcher.add_target(CHAT, "couch", URL_A).await.unwrap();
    h.watcher.add_target(CHAT, "lamp", URL_B).await.unwrap();
    h.watcher.add_filters(CHAT, &["spam".to_string()]).await;
    h.watcher.add_target(OTHER_CHAT, "couch", URL_A).await.unwrap();

    let restarted = restarted(h.store.clone());
    restarted.watcher.rehydrate().await.unwrap();

    let status = restarted.watcher.status(CHAT).await;
    let mut pairs: Vec<(String, String)> = status
        .targets
        .iter()
        .map(|t| (t.name.clone(), t.url.clone()))
        .collect();
    pairs.sort();
    assert_eq!(
        pairs,
        vec![
            ("couch".to_string(), URL_A.to_string()),
            ("lamp".to_string(), URL_B.to_string()),
        ]
    );
    assert_eq!(status.filters, vec!["spam".to_string()]);
    // Jobs are not auto-restarted.
    assert!(!status.running);

    let other = restarted.watcher.status(OTHER_CHAT).await;
    assert_eq!(other.targets.len(), 1);
    assert!(other.filters.is_empty());
}

#[tokio::test]
async fn removals_and_clears_reach_the_store() {
    let h = harness();
    h.watcher.add_target(CHAT, "couch", URL_A).await.unwrap();
    h.watcher.add_target(CHAT, "lamp", URL_B).await.unwrap();
    h.watcher.remove_target(CHAT, "couch").await.unwrap();

    h.watcher.add_filters(CHAT, &["spam".to_string()]).await;
    h.watcher.clear_filters(CHAT).await;

    let restarted = restarted(h.store.clone());
    restarted.watcher.rehydrate().await.unwrap();

    let status = restarted.watcher.status(CHAT).await;
    assert_eq!(status.targets.len(), 1);
    assert_eq!(status.targets[0].name, "lamp");
    assert!(status.filters.is_empty());
}

#[tokio::test]
async fn store_failure_does_not_fail_the_operation() {
    let h = harness();
    h.store.set_should_fail(true);

    // The in-memory mutation still takes effect and the caller sees
    // success; only durability is lost.
    h.watcher.add_target(CHAT, "couch", URL_A).await.unwrap();
    let status = h.watcher.status(CHAT).await;
    assert_eq!(status.targets.len(), 1);

    h.store.set_should_fail(false);
    let restarted = restarted(h.store.clone());
    restarted.watcher.rehydrate().await.unwrap();
    assert!(restarted.watcher.status(CHAT).await.targets.is_empty());
}

#[tokio::test]
async fn sqlite_store_round_trips_targets_and_filters() {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();

    store.save_target(CHAT, "couch", URL_A).await.unwrap();
    store.save_target(CHAT, "lamp", URL_B).await.unwrap();
    store.save_target(OTHER_CHAT, "couch", URL_A).await.unwrap();
    store.save_filter(CHAT, "spam").await.unwrap();

    assert_eq!(
        store.list_targets(CHAT).await.unwrap(),
        vec![
            ("couch".to_string(), URL_A.to_string()),
            ("lamp".to_string(), URL_B.to_string()),
        ]
    );
    assert_eq!(store.list_filters(CHAT).await.unwrap(), vec!["spam".to_string()]);
    assert!(store.list_filters(OTHER_CHAT).await.unwrap().is_empty());

    let mut chats = store.chat_ids().await.unwrap();
    chats.sort();
    assert_eq!(chats, vec![CHAT, OTHER_CHAT]);
}

#[tokio::test]
async fn sqlite_store_replaces_on_same_name_and_deletes_cleanly() {
    let store = SqliteStore::connect("sqlite::memory:").await.unwrap();

    store.save_target(CHAT, "couch", URL_A).await.unwrap();
    store.save_target(CHAT, "couch", URL_B).await.unwrap();
    assert_eq!(
        store.list_targets(CHAT).await.unwrap(),
        vec![("couch".to_string(), URL_B.to_string())]
    );

    store.save_filter(CHAT, "spam").await.unwrap();
    store.save_filter(CHAT, "spam").await.unwrap();
    assert_eq!(store.list_filters(CHAT).await.unwrap().len(), 1);

    store.delete_target(CHAT, "couch").await.unwrap();
    assert!(store.list_targets(CHAT).await.unwrap().is_empty());

    store.save_target(CHAT, "a", URL_A).await.unwrap();
    store.save_target(CHAT, "b", URL_B).await.unwrap();
    store.clear_targets(CHAT).await.unwrap();
    store.clear_filters(CHAT).await.unwrap();
    assert!(store.list_targets(CHAT).await.unwrap().is_empty());
    assert!(store.list_filters(CHAT).await.unwrap().is_empty());
}
