use thiserror::Error;

/// Caller-facing errors for session mutations.
///
/// Every message is written to be relayed directly to the end user by
/// the command layer. Runtime failures inside a tick (fetch, notify,
/// persistence) are logged and isolated instead of surfacing here.
#[derive(Error, Debug)]
pub enum WatchError {
    #[error("that link is not valid: {0}")]
    InvalidTarget(String),

    #[error("a target named '{0}' already exists")]
    DuplicateName(String),

    #[error("no target named '{0}' is registered")]
    TargetNotFound(String),
}
