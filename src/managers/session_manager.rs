//! Session Record Store.
//!
//! One `SessionRecord` per session id, created on first reference or on a
//! top-level navigation, replaced wholesale on every later navigation and
//! dropped on teardown.
//!
//! Locking is partitioned by session: the id map sits behind a `RwLock` that
//! mutators only take for reading, and each record has its own `Mutex`. Only
//! create, reset and destroy take the map for writing. Every record carries an
//! epoch that changes whenever the record is replaced, so results computed
//! against an older record can be detected and dropped.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::services::domain::base_domain_of_url;
use crate::types::session::{SessionId, SessionRecord};

/// Milliseconds since the Unix epoch.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

/// Trait defining the session record store interface.
pub trait SessionManagerTrait {
    /// Replaces (or creates) the record for `id`. Returns the new epoch.
    fn reset(&self, id: &SessionId, url: &str) -> u64;
    /// Creates the record if absent. Returns the live epoch.
    fn ensure(&self, id: &SessionId, fallback_url: &str) -> u64;
    /// Runs `f` on an existing record.
    fn with_record<R>(&self, id: &SessionId, f: impl FnOnce(&mut SessionRecord) -> R) -> Option<R>;
    /// Runs `f` on the record, creating it from `fallback_url` first if needed.
    fn with_record_or_create<R>(
        &self,
        id: &SessionId,
        fallback_url: &str,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> R;
    /// Runs `f` only if the record still exists with the given epoch.
    fn apply_if_current<R>(
        &self,
        id: &SessionId,
        epoch: u64,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> Option<R>;
    /// Copy of the record and its epoch.
    fn get(&self, id: &SessionId) -> Option<(u64, SessionRecord)>;
    /// Discards the record. Returns true if one existed.
    fn destroy(&self, id: &SessionId) -> bool;
    fn contains(&self, id: &SessionId) -> bool;
    fn session_count(&self) -> usize;
}

struct Slot {
    epoch: u64,
    record: Mutex<SessionRecord>,
}

/// In-memory session store.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Slot>>,
    next_epoch: AtomicU64,
    retention: usize,
}

impl SessionManager {
    /// `retention` caps every per-session log.
    pub fn new(retention: usize) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            next_epoch: AtomicU64::new(1),
            retention,
        }
    }

    fn new_slot(&self, url: &str) -> Slot {
        let epoch = self.next_epoch.fetch_add(1, Ordering::Relaxed);
        let record = SessionRecord::new(url, &base_domain_of_url(url), self.retention, now_millis());
        Slot {
            epoch,
            record: Mutex::new(record),
        }
    }
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl SessionManagerTrait for SessionManager {
    fn reset(&self, id: &SessionId, url: &str) -> u64 {
        let slot = self.new_slot(url);
        let epoch = slot.epoch;
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id.clone(), slot);
        epoch
    }

    fn ensure(&self, id: &SessionId, fallback_url: &str) -> u64 {
        if let Some(slot) = self
            .sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
        {
            return slot.epoch;
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        sessions
            .entry(id.clone())
            .or_insert_with(|| self.new_slot(fallback_url))
            .epoch
    }

    fn with_record<R>(&self, id: &SessionId, f: impl FnOnce(&mut SessionRecord) -> R) -> Option<R> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let slot = sessions.get(id)?;
        let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut *record))
    }

    fn with_record_or_create<R>(
        &self,
        id: &SessionId,
        fallback_url: &str,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> R {
        {
            let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(slot) = sessions.get(id) {
                let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
                return f(&mut *record);
            }
        }
        let mut sessions = self.sessions.write().unwrap_or_else(PoisonError::into_inner);
        let slot = sessions
            .entry(id.clone())
            .or_insert_with(|| self.new_slot(fallback_url));
        let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *record)
    }

    fn apply_if_current<R>(
        &self,
        id: &SessionId,
        epoch: u64,
        f: impl FnOnce(&mut SessionRecord) -> R,
    ) -> Option<R> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let slot = sessions.get(id).filter(|slot| slot.epoch == epoch)?;
        let mut record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(&mut *record))
    }

    fn get(&self, id: &SessionId) -> Option<(u64, SessionRecord)> {
        let sessions = self.sessions.read().unwrap_or_else(PoisonError::into_inner);
        let slot = sessions.get(id)?;
        let record = slot.record.lock().unwrap_or_else(PoisonError::into_inner);
        Some((slot.epoch, record.clone()))
    }

    fn destroy(&self, id: &SessionId) -> bool {
        self.sessions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(id)
            .is_some()
    }

    fn contains(&self, id: &SessionId) -> bool {
        self.sessions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(id)
    }

    fn session_count(&self) -> usize {
        self.sessions.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}
