//! Per-session history of generated match profiles.
//!
//! The history is the "avoid-list" fed back into the matchmaker prompt so
//! the model does not reintroduce a partner it already produced for this
//! session. It lives in process memory only: a restart clears it, which
//! matches its session-scoped lifecycle.

use std::collections::HashMap;
use std::sync::Mutex;

/// Upper bound on profiles kept per session. Without a cap the avoid-list
/// grows for the lifetime of the session and would eventually blow past the
/// model's context window; oldest entries are evicted first.
pub const MAX_HISTORY_PROFILES: usize = 20;

/// In-memory store mapping a session id to its ordered profile history.
///
/// Lock scopes are short and never held across an await point. A poisoned
/// lock is recovered rather than propagated: the history is advisory
/// context for the model, losing consistency on a panicked writer is
/// acceptable.
#[derive(Debug, Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<String, Vec<String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the session's history, oldest first.
    pub fn history(&self, session_id: &str) -> Vec<String> {
        let guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get(session_id).cloned().unwrap_or_default()
    }

    /// Appends a generated profile to the session's history, evicting the
    /// oldest entry once the cap is reached.
    pub fn push(&self, session_id: &str, profile: String) {
        let mut guard = match self.inner.lock() {
            Ok(g) => g,
            Err(poisoned) => poisoned.into_inner(),
        };
        let history = guard.entry(session_id.to_string()).or_default();
        if history.len() >= MAX_HISTORY_PROFILES {
            history.remove(0);
        }
        history.push(profile);
    }
}
