// Test dependencies - mock implementations for testing
//
// Provides mock services that can be injected into WatcherDeps for
// tests. Mocks record their calls so tests can assert on interactions.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{bail, Result};
use async_trait::async_trait;

use super::traits::{BaseFetcher, BaseNotifier, BaseStore};
use crate::domains::watch::models::Listing;

// =============================================================================
// Mock Fetcher
// =============================================================================

/// Fetcher returning a configurable current item set per url.
///
/// Urls marked as failing return an error, which the tick must isolate
/// to that target. An optional per-fetch delay makes ticks slow so
/// tests can observe in-flight behavior; the fetcher also tracks how
/// many fetches ever ran concurrently.
#[derive(Default)]
pub struct MockFetcher {
    listings: Arc<Mutex<HashMap<String, Vec<Listing>>>>,
    failing: Arc<Mutex<HashSet<String>>>,
    fetch_calls: Arc<Mutex<Vec<String>>>,
    delay: Arc<Mutex<Option<Duration>>>,
    in_flight: Arc<Mutex<usize>>,
    max_in_flight: Arc<Mutex<usize>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the current item set for a url.
    pub fn with_listings(self, url: &str, listings: Vec<Listing>) -> Self {
        self.set_listings(url, listings);
        self
    }

    /// Replace the current item set for a url.
    pub fn set_listings(&self, url: &str, listings: Vec<Listing>) {
        self.listings
            .lock()
            .unwrap()
            .insert(url.to_string(), listings);
    }

    /// Make fetches for a url fail (or succeed again).
    pub fn set_failing(&self, url: &str, failing: bool) {
        let mut set = self.failing.lock().unwrap();
        if failing {
            set.insert(url.to_string());
        } else {
            set.remove(url);
        }
    }

    /// Make every successful fetch take this long.
    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = Some(delay);
    }

    /// Highest number of fetches that were ever in flight at once.
    pub fn max_in_flight(&self) -> usize {
        *self.max_in_flight.lock().unwrap()
    }

    /// All urls fetched, in call order.
    pub fn fetch_calls(&self) -> Vec<String> {
        self.fetch_calls.lock().unwrap().clone()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.lock().unwrap().len()
    }

    pub fn was_fetched(&self, url: &str) -> bool {
        self.fetch_calls.lock().unwrap().iter().any(|u| u == url)
    }
}

#[async_trait]
impl BaseFetcher for MockFetcher {
    async fn fetch_listings(&self, url: &str) -> Result<Vec<Listing>> {
        self.fetch_calls.lock().unwrap().push(url.to_string());

        if self.failing.lock().unwrap().contains(url) {
            bail!("mock fetch failure for {url}");
        }

        let delay = *self.delay.lock().unwrap();
        if let Some(delay) = delay {
            {
                let mut in_flight = self.in_flight.lock().unwrap();
                *in_flight += 1;
                let mut max = self.max_in_flight.lock().unwrap();
                *max = (*max).max(*in_flight);
            }
            tokio::time::sleep(delay).await;
            *self.in_flight.lock().unwrap() -= 1;
        }

        Ok(self
            .listings
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .unwrap_or_default())
    }
}

// =============================================================================
// Mock Notifier
// =============================================================================

/// Notifier that records every message instead of sending it.
#[derive(Default)]
pub struct MockNotifier {
    sent: Arc<Mutex<Vec<(i64, String)>>>,
    should_fail: Arc<Mutex<bool>>,
}

impl MockNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// All (chat_id, text) pairs sent, in call order.
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }

    /// Messages sent to one chat, in call order.
    pub fn sent_to(&self, chat_id: i64) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| *id == chat_id)
            .map(|(_, text)| text.clone())
            .collect()
    }

    pub fn sent_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }
}

#[async_trait]
impl BaseNotifier for MockNotifier {
    async fn send(&self, chat_id: i64, text: &str) -> Result<()> {
        // Record even failed sends; tests assert on attempted delivery.
        self.sent.lock().unwrap().push((chat_id, text.to_string()));

        if *self.should_fail.lock().unwrap() {
            bail!("mock notifier failure");
        }
        Ok(())
    }
}

// =============================================================================
// In-memory Store
// =============================================================================

#[derive(Default, Clone)]
struct ChatRows {
    targets: Vec<(String, String)>,
    filters: Vec<String>,
}

/// In-memory implementation of `BaseStore` with the same upsert
/// semantics as the SQLite store (replace by name, filters deduped).
/// Writes can be made to fail to exercise the best-effort contract.
#[derive(Default)]
pub struct MemoryStore {
    chats: Mutex<HashMap<i64, ChatRows>>,
    should_fail: Mutex<bool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_should_fail(&self, should_fail: bool) {
        *self.should_fail.lock().unwrap() = should_fail;
    }

    fn check_writable(&self) -> Result<()> {
        if *self.should_fail.lock().unwrap() {
            bail!("mock store failure");
        }
        Ok(())
    }
}

#[async_trait]
impl BaseStore for MemoryStore {
    async fn save_target(&self, chat_id: i64, name: &str, url: &str) -> Result<()> {
        self.check_writable()?;
        let mut chats = self.chats.lock().unwrap();
        let rows = chats.entry(chat_id).or_default();
        rows.targets.retain(|(n, _)| n != name);
        rows.targets.push((name.to_string(), url.to_string()));
        Ok(())
    }

    async fn delete_target(&self, chat_id: i64, name: &str) -> Result<()> {
        self.check_writable()?;
        let mut chats = self.chats.lock().unwrap();
        if let Some(rows) = chats.get_mut(&chat_id) {
            rows.targets.retain(|(n, _)| n != name);
        }
        Ok(())
    }

    async fn clear_targets(&self, chat_id: i64) -> Result<()> {
        self.check_writable()?;
        let mut chats = self.chats.lock().unwrap();
        if let Some(rows) = chats.get_mut(&chat_id) {
            rows.targets.clear();
        }
        Ok(())
    }

    async fn list_targets(&self, chat_id: i64) -> Result<Vec<(String, String)>> {
        let chats = self.chats.lock().unwrap();
        Ok(chats
            .get(&chat_id)
            .map(|rows| rows.targets.clone())
            .unwrap_or_default())
    }

    async fn save_filter(&self, chat_id: i64, filter: &str) -> Result<()> {
        self.check_writable()?;
        let mut chats = self.chats.lock().unwrap();
        let rows = chats.entry(chat_id).or_default();
        if !rows.filters.iter().any(|f| f == filter) {
            rows.filters.push(filter.to_string());
        }
        Ok(())
    }

    async fn clear_filters(&self, chat_id: i64) -> Result<()> {
        self.check_writable()?;
        let mut chats = self.chats.lock().unwrap();
        if let Some(rows) = chats.get_mut(&chat_id) {
            rows.filters.clear();
        }
        Ok(())
    }

    async fn list_filters(&self, chat_id: i64) -> Result<Vec<String>> {
        let chats = self.chats.lock().unwrap();
        Ok(chats
            .get(&chat_id)
            .map(|rows| rows.filters.clone())
            .unwrap_or_default())
    }

    async fn chat_ids(&self) -> Result<Vec<i64>> {
        let chats = self.chats.lock().unwrap();
        Ok(chats.keys().copied().collect())
    }
}
