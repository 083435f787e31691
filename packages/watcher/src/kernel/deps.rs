//! Watcher dependencies (using traits for testability)
//!
//! Central dependency container handed to the scheduler and the command
//! surface. All external services sit behind trait objects so tests can
//! inject mocks.

use std::sync::Arc;

use super::traits::{BaseFetcher, BaseNotifier, BaseStore};

/// Dependencies accessible to the watch domain
#[derive(Clone)]
pub struct WatcherDeps {
    pub fetcher: Arc<dyn BaseFetcher>,
    pub notifier: Arc<dyn BaseNotifier>,
    pub store: Arc<dyn BaseStore>,
}

impl WatcherDeps {
    pub fn new(
        fetcher: Arc<dyn BaseFetcher>,
        notifier: Arc<dyn BaseNotifier>,
        store: Arc<dyn BaseStore>,
    ) -> Self {
        Self {
            fetcher,
            notifier,
            store,
        }
    }
}
