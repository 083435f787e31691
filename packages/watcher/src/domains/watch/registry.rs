//! SessionRegistry - the chat-id → session map.
//!
//! The only structure shared across logical actors (command layer,
//! scheduler ticks, restart rehydration). Sessions live for the process
//! lifetime, so the map only ever grows.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use super::session::Session;

#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<i64, Arc<Session>>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the session for `chat_id`, creating an empty idle one on
    /// first contact. The flag is true when the session was just
    /// created, so callers can tell "already registered" apart from
    /// "freshly registered".
    pub fn get_or_create(&self, chat_id: i64) -> (Arc<Session>, bool) {
        // Fast path: session already exists.
        if let Some(session) = self
            .sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&chat_id)
        {
            return (Arc::clone(session), false);
        }

        let mut sessions = self.sessions.write().unwrap_or_else(|e| e.into_inner());
        // Re-check under the write lock; another caller may have won.
        if let Some(session) = sessions.get(&chat_id) {
            return (Arc::clone(session), false);
        }
        let session = Arc::new(Session::new(chat_id));
        sessions.insert(chat_id, Arc::clone(&session));
        (session, true)
    }

    pub fn get(&self, chat_id: i64) -> Option<Arc<Session>> {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&chat_id)
            .cloned()
    }

    pub fn exists(&self, chat_id: i64) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(&chat_id)
    }
}
