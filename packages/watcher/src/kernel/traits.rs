// Trait definitions for dependency injection
//
// These are INFRASTRUCTURE traits only - no business logic.
// Business logic (diffing, filtering, scheduling) lives in the watch
// domain and uses these traits through `WatcherDeps`.
//
// Naming convention: Base* for trait names (e.g., BaseFetcher)

use anyhow::Result;
use async_trait::async_trait;

use crate::domains::watch::models::Listing;

// =============================================================================
// Fetcher Trait (Infrastructure - current item set for a target)
// =============================================================================

/// Produces the current item set for a monitored search link.
///
/// Implementations own the scraping/parsing of the target page; the
/// core only relies on stable listing ids and fetch-result order.
#[async_trait]
pub trait BaseFetcher: Send + Sync {
    /// Fetch the listings currently visible at `url`.
    async fn fetch_listings(&self, url: &str) -> Result<Vec<Listing>>;
}

// =============================================================================
// Notifier Trait (Infrastructure - outbound chat messages)
// =============================================================================

/// Delivers a text message to a chat. Failures are non-fatal to the
/// caller; the core logs them and never retries.
#[async_trait]
pub trait BaseNotifier: Send + Sync {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()>;
}

// =============================================================================
// Store Trait (Infrastructure - durable target/filter lists)
// =============================================================================

/// Durable store for each chat's targets and filters.
///
/// All rows are keyed by `chat_id` so that multi-session state survives
/// a restart without being misattributed. Writes are best-effort side
/// effects of in-memory mutations: a store failure is logged but never
/// blocks the in-memory change.
#[async_trait]
pub trait BaseStore: Send + Sync {
    async fn save_target(&self, chat_id: i64, name: &str, url: &str) -> Result<()>;
    async fn delete_target(&self, chat_id: i64, name: &str) -> Result<()>;
    async fn clear_targets(&self, chat_id: i64) -> Result<()>;
    async fn list_targets(&self, chat_id: i64) -> Result<Vec<(String, String)>>;

    async fn save_filter(&self, chat_id: i64, filter: &str) -> Result<()>;
    async fn clear_filters(&self, chat_id: i64) -> Result<()>;
    async fn list_filters(&self, chat_id: i64) -> Result<Vec<String>>;

    /// All chat ids with any persisted state, for restart rehydration.
    async fn chat_ids(&self) -> Result<Vec<i64>>;
}
