//! Session - the per-chat aggregate.
//!
//! A session owns its targets and filters exclusively. They sit behind
//! an async mutex so that command-layer mutations and an in-flight tick
//! on the same session are mutually exclusive, while sessions never
//! block each other. The job slot is a separate sync mutex so that
//! start/stop/is_running stay synchronous and `is_running` reflects a
//! `stop` immediately, even while a tick is still finishing.

use std::sync::Mutex as StdMutex;

use tokio::sync::Mutex;

use super::errors::WatchError;
use super::models::{FilterSet, Target};
use super::scheduler::FetchJob;

/// The mutable half of a session: targets plus filters.
#[derive(Default)]
pub struct SessionState {
    pub(crate) targets: Vec<Target>,
    pub(crate) filters: FilterSet,
}

impl SessionState {
    /// Append a target; fails on a name collision without mutating.
    pub fn add_target(&mut self, target: Target) -> Result<(), WatchError> {
        if self.targets.iter().any(|t| t.name() == target.name()) {
            return Err(WatchError::DuplicateName(target.name().to_string()));
        }
        self.targets.push(target);
        Ok(())
    }

    /// Remove a target by name, returning it.
    pub fn remove_target(&mut self, name: &str) -> Result<Target, WatchError> {
        let index = self
            .targets
            .iter()
            .position(|t| t.name() == name)
            .ok_or_else(|| WatchError::TargetNotFound(name.to_string()))?;
        Ok(self.targets.remove(index))
    }

    /// Remove all targets, returning the removed list for reporting.
    pub fn clear_targets(&mut self) -> Vec<Target> {
        std::mem::take(&mut self.targets)
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn add_filter(&mut self, filter: impl Into<String>) {
        self.filters.add(filter);
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }
}

/// One chat's session: identity, state, and the fetch-job slot.
pub struct Session {
    chat_id: i64,
    state: Mutex<SessionState>,
    job: StdMutex<Option<FetchJob>>,
}

impl Session {
    pub fn new(chat_id: i64) -> Self {
        Self {
            chat_id,
            state: Mutex::new(SessionState::default()),
            job: StdMutex::new(None),
        }
    }

    pub fn chat_id(&self) -> i64 {
        self.chat_id
    }

    pub fn state(&self) -> &Mutex<SessionState> {
        &self.state
    }

    pub(crate) fn job_slot(&self) -> &StdMutex<Option<FetchJob>> {
        &self.job
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn target(name: &str) -> Target {
        Target::new(name, "https://example.org/s").unwrap()
    }

    #[test]
    fn duplicate_target_name_is_rejected() {
        let mut state = SessionState::default();
        state.add_target(target("couch")).unwrap();

        let err = state.add_target(target("couch")).unwrap_err();
        assert!(matches!(err, WatchError::DuplicateName(_)));
        assert_eq!(state.targets().len(), 1);
    }

    #[test]
    fn removing_unknown_target_leaves_state_unchanged() {
        let mut state = SessionState::default();
        state.add_target(target("couch")).unwrap();

        let err = state.remove_target("lamp").unwrap_err();
        assert!(matches!(err, WatchError::TargetNotFound(_)));
        assert_eq!(state.targets().len(), 1);
    }

    #[test]
    fn clear_returns_removed_targets() {
        let mut state = SessionState::default();
        state.add_target(target("a")).unwrap();
        state.add_target(target("b")).unwrap();

        let removed = state.clear_targets();
        assert_eq!(removed.len(), 2);
        assert!(state.targets().is_empty());
    }
}
