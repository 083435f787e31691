// Kernel - infrastructure seams and their concrete adapters
//
// Traits here are INFRASTRUCTURE only - no watch/diff business logic.
// The watch domain consumes them through `WatcherDeps`.

pub mod deps;
pub mod sqlite_store;
pub mod telegram;
pub mod test_dependencies;
pub mod traits;

pub use deps::WatcherDeps;
pub use sqlite_store::SqliteStore;
pub use telegram::TelegramNotifier;
pub use traits::{BaseFetcher, BaseNotifier, BaseStore};
