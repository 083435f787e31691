//! FetchScheduler - one cancellable periodic job per session.
//!
//! `start` spawns a task that runs a tick immediately and then every
//! `period`. Ticks for one session are strictly sequential: the loop
//! awaits each tick before selecting again, and `MissedTickBehavior::
//! Delay` pushes the schedule back instead of bursting when a tick
//! overruns the interval. Sessions run their jobs independently.
//!
//! `stop` cancels the token and empties the job slot, so `is_running`
//! flips to false immediately; an in-flight tick is allowed to finish
//! but no further tick is scheduled.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::session::Session;
use super::tick::run_tick;
use crate::kernel::WatcherDeps;

/// Handle to a running per-session fetch loop.
pub struct FetchJob {
    cancel: CancellationToken,
    #[allow(dead_code)]
    handle: JoinHandle<()>,
}

#[derive(Clone)]
pub struct FetchScheduler {
    deps: WatcherDeps,
    period: Duration,
}

impl FetchScheduler {
    pub fn new(deps: WatcherDeps, period: Duration) -> Self {
        Self { deps, period }
    }

    /// Start the periodic job for `session`. Idempotent: returns false
    /// without side effects if the job is already running.
    pub fn start(&self, session: &Arc<Session>) -> bool {
        let mut slot = session.job_slot().lock().unwrap_or_else(|e| e.into_inner());
        if slot.is_some() {
            return false;
        }

        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run_loop(
            Arc::clone(session),
            self.deps.clone(),
            self.period,
            cancel.clone(),
        ));
        *slot = Some(FetchJob { cancel, handle });

        info!(chat_id = session.chat_id(), "fetch job started");
        true
    }

    /// Stop the periodic job. Returns false if it was not running; the
    /// stop is performed (or a no-op) either way.
    pub fn stop(&self, session: &Session) -> bool {
        let taken = session
            .job_slot()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        match taken {
            Some(job) => {
                job.cancel.cancel();
                info!(chat_id = session.chat_id(), "fetch job stopped");
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self, session: &Session) -> bool {
        session
            .job_slot()
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }
}

async fn run_loop(
    session: Arc<Session>,
    deps: WatcherDeps,
    period: Duration,
    cancel: CancellationToken,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            // Biased: a pending cancel wins over a tick that came due
            // while the previous one was still running.
            biased;
            _ = cancel.cancelled() => break,
            // The first tick completes immediately, seeding fresh
            // targets without waiting a full period.
            _ = interval.tick() => run_tick(&session, &deps).await,
        }
    }

    debug!(chat_id = session.chat_id(), "fetch loop exited");
}
