// Classified-Ad Watch Core
//
// This crate provides the scheduling and deduplication engine behind a
// chat-driven classified-ad watcher: per-chat sessions own a set of
// monitored search links, a periodic fetch job diffs each link against
// the item ids it has already seen, and only unseen items that survive
// the session's filters are pushed back to the chat.
//
// Command parsing, HTML scraping, and message delivery live behind the
// traits in `kernel::traits` and are supplied by the embedding
// application.

pub mod config;
pub mod domains;
pub mod kernel;

pub use config::*;
