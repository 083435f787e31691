//! Watcher - the command surface consumed by the dispatch layer.
//!
//! Each operation mutates the in-memory session first, then mirrors the
//! change into the store best-effort: a persistence failure is logged
//! but never fails the caller-facing operation, because the in-memory
//! state stays authoritative for the running process.

use std::future::Future;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::errors::WatchError;
use super::models::Target;
use super::registry::SessionRegistry;
use super::scheduler::FetchScheduler;
use crate::kernel::WatcherDeps;

/// Per-target slice of a status report.
#[derive(Debug, Clone, Serialize)]
pub struct TargetStatus {
    pub name: String,
    pub url: String,
    pub seen_count: usize,
    pub last_checked_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

/// Status report for one session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStatus {
    pub running: bool,
    pub targets: Vec<TargetStatus>,
    pub filters: Vec<String>,
}

/// Result of a successful `remove_target`.
#[derive(Debug, Clone, Serialize)]
pub struct RemoveOutcome {
    pub name: String,
    /// True when removing the last target also stopped the fetch job.
    pub job_stopped: bool,
}

pub struct Watcher {
    registry: SessionRegistry,
    scheduler: FetchScheduler,
    deps: WatcherDeps,
}

impl Watcher {
    pub fn new(deps: WatcherDeps, fetch_interval: Duration) -> Self {
        Self {
            registry: SessionRegistry::new(),
            scheduler: FetchScheduler::new(deps.clone(), fetch_interval),
            deps,
        }
    }

    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    pub fn scheduler(&self) -> &FetchScheduler {
        &self.scheduler
    }

    /// Register the chat. Returns true when the session was just
    /// created, false when it was already registered.
    pub fn register_session(&self, chat_id: i64) -> bool {
        let (_, created) = self.registry.get_or_create(chat_id);
        if created {
            info!(chat_id, "registered new chat session");
        }
        created
    }

    /// Add a monitored link. Validates the url before touching state.
    pub async fn add_target(&self, chat_id: i64, name: &str, url: &str) -> Result<(), WatchError> {
        let target = Target::new(name, url)?;
        let (session, _) = self.registry.get_or_create(chat_id);

        session.state().lock().await.add_target(target)?;
        info!(chat_id, name, url, "target added");

        self.persist(chat_id, "save target", self.deps.store.save_target(chat_id, name, url))
            .await;
        Ok(())
    }

    /// Remove a monitored link by name. When the last target goes away
    /// the fetch job is stopped too, so idle sessions don't keep
    /// polling nothing.
    pub async fn remove_target(&self, chat_id: i64, name: &str) -> Result<RemoveOutcome, WatchError> {
        let (session, _) = self.registry.get_or_create(chat_id);

        let now_empty = {
            let mut state = session.state().lock().await;
            state.remove_target(name)?;
            state.targets().is_empty()
        };

        let job_stopped = now_empty && self.scheduler.stop(&session);
        info!(chat_id, name, job_stopped, "target removed");

        self.persist(chat_id, "delete target", self.deps.store.delete_target(chat_id, name))
            .await;

        Ok(RemoveOutcome {
            name: name.to_string(),
            job_stopped,
        })
    }

    /// Remove all targets, stopping the fetch job first. Returns the
    /// removed (name, url) pairs for reporting.
    pub async fn clear_targets(&self, chat_id: i64) -> Vec<(String, String)> {
        let (session, _) = self.registry.get_or_create(chat_id);
        self.scheduler.stop(&session);

        let removed: Vec<(String, String)> = session
            .state()
            .lock()
            .await
            .clear_targets()
            .iter()
            .map(|t| (t.name().to_string(), t.url().to_string()))
            .collect();
        info!(chat_id, removed = removed.len(), "targets cleared");

        self.persist(chat_id, "clear targets", self.deps.store.clear_targets(chat_id))
            .await;
        removed
    }

    /// Append filters (duplicates allowed, inert). Returns the full
    /// filter list afterwards for reporting.
    pub async fn add_filters(&self, chat_id: i64, filters: &[String]) -> Vec<String> {
        let (session, _) = self.registry.get_or_create(chat_id);

        let current = {
            let mut state = session.state().lock().await;
            for filter in filters {
                state.add_filter(filter.clone());
            }
            state.filters().as_slice().to_vec()
        };

        for filter in filters {
            self.persist(chat_id, "save filter", self.deps.store.save_filter(chat_id, filter))
                .await;
        }
        current
    }

    pub async fn clear_filters(&self, chat_id: i64) {
        let (session, _) = self.registry.get_or_create(chat_id);
        session.state().lock().await.clear_filters();
        info!(chat_id, "filters cleared");

        self.persist(chat_id, "clear filters", self.deps.store.clear_filters(chat_id))
            .await;
    }

    pub async fn list_filters(&self, chat_id: i64) -> Vec<String> {
        let (session, _) = self.registry.get_or_create(chat_id);
        let state = session.state().lock().await;
        state.filters().as_slice().to_vec()
    }

    /// Start the periodic fetch job. Returns false when it was already
    /// running (idempotent).
    pub fn start_job(&self, chat_id: i64) -> bool {
        let (session, _) = self.registry.get_or_create(chat_id);
        self.scheduler.start(&session)
    }

    /// Stop the fetch job. Returns false when it was not running, so
    /// the caller can warn the user; the stop happens regardless.
    pub fn stop_job(&self, chat_id: i64) -> bool {
        let (session, _) = self.registry.get_or_create(chat_id);
        self.scheduler.stop(&session)
    }

    pub async fn status(&self, chat_id: i64) -> SessionStatus {
        let (session, _) = self.registry.get_or_create(chat_id);
        let running = self.scheduler.is_running(&session);

        let state = session.state().lock().await;
        SessionStatus {
            running,
            targets: state
                .targets()
                .iter()
                .map(|t| TargetStatus {
                    name: t.name().to_string(),
                    url: t.url().to_string(),
                    seen_count: t.seen_count(),
                    last_checked_at: t.last_checked_at(),
                    last_error: t.last_error().map(str::to_string),
                })
                .collect(),
            filters: state.filters().as_slice().to_vec(),
        }
    }

    /// Rebuild every persisted session's targets and filters after a
    /// restart. Jobs are not restarted; the user starts them
    /// explicitly. Invalid persisted rows are logged and skipped.
    pub async fn rehydrate(&self) -> Result<()> {
        for chat_id in self.deps.store.chat_ids().await? {
            let (session, _) = self.registry.get_or_create(chat_id);
            let mut state = session.state().lock().await;

            for (name, url) in self.deps.store.list_targets(chat_id).await? {
                let target = match Target::new(&name, &url) {
                    Ok(target) => target,
                    Err(e) => {
                        warn!(chat_id, name = %name, url = %url, error = %e, "skipping invalid persisted target");
                        continue;
                    }
                };
                if let Err(e) = state.add_target(target) {
                    warn!(chat_id, name = %name, error = %e, "skipping duplicate persisted target");
                }
            }

            for filter in self.deps.store.list_filters(chat_id).await? {
                state.add_filter(filter);
            }

            info!(
                chat_id,
                targets = state.targets().len(),
                filters = state.filters().as_slice().len(),
                "session rehydrated"
            );
        }
        Ok(())
    }

    /// Run the session for `chat_id` through one tick immediately,
    /// outside the periodic schedule. Used by tests and by callers that
    /// want a "check now" operation.
    pub async fn tick_now(&self, chat_id: i64) {
        let (session, _) = self.registry.get_or_create(chat_id);
        super::tick::run_tick(&session, &self.deps).await;
    }

    fn persist<'a, F>(
        &'a self,
        chat_id: i64,
        operation: &'a str,
        write: F,
    ) -> impl Future<Output = ()> + 'a
    where
        F: Future<Output = Result<()>> + 'a,
    {
        async move {
            if let Err(e) = write.await {
                // Best-effort: in-memory state already changed and stays
                // authoritative for this process lifetime.
                warn!(chat_id, operation, error = %e, "persistence write failed");
            }
        }
    }
}
