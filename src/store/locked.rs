//! Visit store guarded by a single reader-writer lock.
//!
//! [`LockedStore`] keeps the whole state behind a
//! [`crossbeam_utils::sync::ShardedLock`]. Readers take one shard of the lock
//! and run in parallel with each other; a writer takes every shard and holds
//! them for the full check-and-insert sequence, so no two `record` calls can
//! observe the same visitor as new.

use crossbeam_utils::sync::ShardedLock;

use crate::error::{Result, VisitError};
use crate::store::{PageVisitors, VisitStore};
use crate::visit::{Count, Visit};

/// A visit store using a reader-writer lock.
///
/// Writes are serialized globally; reads only wait for a writer currently
/// holding the lock. Both critical sections are O(1).
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use std::thread;
/// use visitatori::store::{LockedStore, VisitStore};
/// use visitatori::visit::Visit;
///
/// let store = Arc::new(LockedStore::new());
/// let mut handles = vec![];
///
/// for t in 0..4 {
///     let s = Arc::clone(&store);
///     handles.push(thread::spawn(move || {
///         for i in 0..100 {
///             s.record(&Visit::new(format!("{t}-{i}"), "url")).unwrap();
///         }
///     }));
/// }
///
/// for h in handles {
///     h.join().unwrap();
/// }
///
/// assert_eq!(store.count("url").unwrap(), 400);
/// ```
#[derive(Debug, Default)]
pub struct LockedStore {
    state: ShardedLock<PageVisitors>,
}

impl LockedStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl VisitStore for LockedStore {
    fn record(&self, visit: &Visit) -> Result<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| VisitError::store("visit store lock poisoned"))?;
        state.insert(visit);
        Ok(())
    }

    fn count(&self, page: &str) -> Result<Count> {
        let state = self
            .state
            .read()
            .map_err(|_| VisitError::store("visit store lock poisoned"))?;
        Ok(state.count(page))
    }
}
