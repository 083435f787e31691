//! The fetch → diff → filter → notify cycle.
//!
//! One tick walks every target of a session. Failures are isolated per
//! target and per message: a broken link or an undeliverable
//! notification is logged and skipped, never aborting the rest of the
//! tick or the scheduler.

use tracing::{debug, warn};

use super::session::{Session, SessionState};
use crate::kernel::WatcherDeps;

/// Run one tick for `session`.
///
/// Holds the session state lock for the whole tick, which is what makes
/// command-layer mutations mutually exclusive with tick execution.
pub async fn run_tick(session: &Session, deps: &WatcherDeps) {
    let chat_id = session.chat_id();
    let mut state = session.state().lock().await;
    let SessionState { targets, filters } = &mut *state;

    for target in targets.iter_mut() {
        let listings = match deps.fetcher.fetch_listings(target.url()).await {
            Ok(listings) => listings,
            Err(e) => {
                // Partial-failure isolation: seen ids stay untouched so
                // nothing is lost or double-notified once the link recovers.
                warn!(
                    chat_id,
                    target = target.name(),
                    error = %e,
                    "fetch failed, skipping target for this tick"
                );
                target.record_failure(e.to_string());
                continue;
            }
        };

        target.record_success();

        let was_primed = target.is_primed();
        let fresh = target.absorb(listings);

        if !was_primed {
            debug!(
                chat_id,
                target = target.name(),
                seen = target.seen_count(),
                "seeded target on first scan"
            );
            continue;
        }

        for listing in fresh {
            if filters.matches(&listing.title) {
                debug!(
                    chat_id,
                    target = target.name(),
                    listing = %listing.id,
                    "listing suppressed by filter"
                );
                continue;
            }

            // At-most-once: the id is already absorbed into seen, so a
            // failed send is logged rather than retried on later ticks.
            if let Err(e) = deps.notifier.send(chat_id, &listing.render()).await {
                warn!(
                    chat_id,
                    target = target.name(),
                    listing = %listing.id,
                    error = %e,
                    "failed to deliver notification"
                );
            }
        }
    }
}
