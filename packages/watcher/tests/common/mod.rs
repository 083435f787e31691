// Common test utilities
//
// Each integration test binary compiles this module separately and
// uses a different subset of it.
#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use watcher_core::domains::watch::Watcher;
use watcher_core::kernel::test_dependencies::{MemoryStore, MockFetcher, MockNotifier};
use watcher_core::kernel::WatcherDeps;

pub struct TestHarness {
    pub fetcher: Arc<MockFetcher>,
    pub notifier: Arc<MockNotifier>,
    pub store: Arc<MemoryStore>,
    pub watcher: Watcher,
}

pub fn harness() -> TestHarness {
    harness_with_interval(Duration::from_secs(60))
}

pub fn harness_with_interval(fetch_interval: Duration) -> TestHarness {
    init_tracing();

    let fetcher = Arc::new(MockFetcher::new());
    let notifier = Arc::new(MockNotifier::new());
    let store = Arc::new(MemoryStore::new());
    let deps = WatcherDeps::new(fetcher.clone(), notifier.clone(), store.clone());

    TestHarness {
        fetcher,
        notifier,
        store,
        watcher: Watcher::new(deps, fetch_interval),
    }
}

/// Build a second watcher over an existing store, simulating a restart.
pub fn restarted(store: Arc<MemoryStore>) -> TestHarness {
    let fetcher = Arc::new(MockFetcher::new());
    let notifier = Arc::new(MockNotifier::new());
    let deps = WatcherDeps::new(fetcher.clone(), notifier.clone(), store.clone());

    TestHarness {
        fetcher,
        notifier,
        store,
        watcher: Watcher::new(deps, Duration::from_secs(60)),
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
