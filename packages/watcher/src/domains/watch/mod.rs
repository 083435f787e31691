// Watch domain - sessions, targets, filters, and the fetch job
//
// The aggregate root is `Session` (one per chat), looked up through
// `SessionRegistry`. `FetchScheduler` owns the periodic job per
// session; `tick` implements the fetch → diff → filter → notify cycle.
// `Watcher` is the command surface consumed by the dispatch layer.

pub mod actions;
pub mod errors;
pub mod models;
pub mod registry;
pub mod scheduler;
pub mod session;
pub mod tick;

pub use actions::{RemoveOutcome, SessionStatus, TargetStatus, Watcher};
pub use errors::WatchError;
pub use models::{FilterSet, Listing, Target};
pub use registry::SessionRegistry;
pub use scheduler::FetchScheduler;
pub use session::{Session, SessionState};
pub use tick::run_tick;
