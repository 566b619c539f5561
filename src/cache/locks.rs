//! Per-Key Lock Module
//!
//! In-process advisory locks that serialize file I/O on the same key.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, Weak};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Guard held for the duration of one operation on a key.
pub type KeyGuard = OwnedMutexGuard<()>;

// == Key Locks ==
/// Table of per-key async mutexes.
///
/// The table only holds weak references; a key's mutex is dropped as soon as
/// no operation holds or waits on it, and stale slots are pruned on the next
/// acquisition.
#[derive(Debug, Default)]
pub struct KeyLocks {
    table: Mutex<HashMap<String, Weak<AsyncMutex<()>>>>,
}

impl KeyLocks {
    // == Constructor ==
    /// Creates an empty lock table.
    pub fn new() -> Self {
        Self::default()
    }

    // == Lock ==
    /// Waits for exclusive access to `key` (expected in normalized form).
    pub async fn lock(&self, key: &str) -> KeyGuard {
        let mutex = {
            let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
            table.retain(|_, slot| slot.strong_count() > 0);

            match table.get(key).and_then(Weak::upgrade) {
                Some(mutex) => mutex,
                None => {
                    let mutex = Arc::new(AsyncMutex::new(()));
                    table.insert(key.to_string(), Arc::downgrade(&mutex));
                    mutex
                }
            }
        };
        mutex.lock_owned().await
    }

    // == Length ==
    /// Returns the number of keys currently locked or awaited.
    pub fn len(&self) -> usize {
        let table = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        table.values().filter(|slot| slot.strong_count() > 0).count()
    }

    /// Returns true if no key is currently locked or awaited.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
