use super::types::WipeStatus;
use crate::{WipeError, WipeResult};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Keyed session store.
///
/// Every change clones the current snapshot, edits the copy and swaps it
/// in under the write lock, so readers only ever see whole snapshots.
/// Entries are never removed.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, WipeStatus>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session. Ids are never reused.
    pub fn insert(&self, status: WipeStatus) -> WipeResult<()> {
        let mut sessions = self.write();
        if sessions.contains_key(&status.session_id) {
            return Err(WipeError::InvalidRequest(format!(
                "Session {} already exists",
                status.session_id
            )));
        }
        sessions.insert(status.session_id.clone(), status);
        Ok(())
    }

    pub fn get(&self, session_id: &str) -> Option<WipeStatus> {
        self.read().get(session_id).cloned()
    }

    /// Replace the snapshot of `session_id` with an edited copy.
    /// Returns false for an unknown id.
    pub fn update<F>(&self, session_id: &str, edit: F) -> bool
    where
        F: FnOnce(&mut WipeStatus),
    {
        let mut sessions = self.write();
        let Some(current) = sessions.get(session_id) else {
            return false;
        };

        let mut next = current.clone();
        edit(&mut next);
        sessions.insert(session_id.to_string(), next);
        true
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panicking writer cannot leave a half-edited snapshot behind, so
    // the data under a poisoned lock is still consistent.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, WipeStatus>> {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, WipeStatus>> {
        self.sessions.write().unwrap_or_else(PoisonError::into_inner)
    }
}
