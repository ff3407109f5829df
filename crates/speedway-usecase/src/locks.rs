//! Per-match write locks
//!
//! Requests for different matches run in parallel; requests for the same
//! match queue behind one another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use speedway_domain::MatchId;

#[derive(Debug, Default)]
pub struct MatchLocks {
    locks: Mutex<HashMap<MatchId, Arc<Mutex<()>>>>,
}

impl MatchLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// The lock guarding `id`, created on first use
    pub fn lock_for(&self, id: &MatchId) -> Arc<Mutex<()>> {
        // The map only holds handles; a poisoned guard leaves it consistent
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Drop the lock of a deleted match
    pub fn forget(&self, id: &MatchId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.remove(id);
    }

    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
