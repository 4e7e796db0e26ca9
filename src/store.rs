//! The visit store: per-page sets of distinct visitors with an O(1) counter.
//!
//! Every page that has been visited at least once owns two entries: the set
//! of visitors recorded so far and its precomputed cardinality. The store
//! keeps them in lockstep; after any operation returns, the counter of a
//! page always equals the size of its visitor set.
//!
//! # Strategies
//!
//! Two implementations of [`VisitStore`] provide the same observable
//! behaviour with different synchronization:
//!
//! | Strategy | Type | Reads | Writes |
//! |----------|------|-------|--------|
//! | [`Strategy::Locked`] | [`LockedStore`] | shared, run in parallel | exclusive, global |
//! | [`Strategy::Serialized`] | [`SerializedStore`] | queued | queued |
//!
//! ```text
//!   Locked                              Serialized
//!
//!   record ──write──►┌───────────┐      record ──┐
//!   count  ──read───►│ShardedLock│      count  ──┼─► queue ──► worker ──► state
//!   count  ──read───►│  (state)  │      record ──┘      ▲           │
//!                    └───────────┘                      └── reply ◄─┘
//! ```
//!
//! The locked strategy is the default and the one to use in production. The
//! serialized strategy imposes a total order over every operation, including
//! operations on unrelated pages, and pays a queue round trip per call.
//!
//! # Example
//!
//! ```rust
//! use visitatori::store::Strategy;
//! use visitatori::visit::Visit;
//!
//! let store = Strategy::Locked.build()?;
//! store.record(&Visit::new("id", "url"))?;
//! store.record(&Visit::new("id", "url"))?;
//! store.record(&Visit::new("id2", "url"))?;
//!
//! assert_eq!(store.count("url")?, 2);
//! assert_eq!(store.count("never-seen")?, 0);
//! # Ok::<(), visitatori::error::VisitError>(())
//! ```

mod locked;
mod serialized;

pub use locked::LockedStore;
pub use serialized::SerializedStore;

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tracing::trace;

use crate::error::Result;
use crate::visit::{Count, PageUrl, Visit, VisitorId};

/// Default bound of the serialized strategy's request queue.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Contract shared by every visit store.
///
/// Implementations must make the "is this visitor new for this page, then
/// increment" sequence atomic per call, so that concurrent callers can never
/// both count the same visitor.
pub trait VisitStore: Send + Sync + Debug {
    /// Records `visit`. Recording the same visitor twice on a page is a no-op.
    ///
    /// Once this returns `Ok`, every later [`count`](VisitStore::count) for
    /// the same page, from any thread, includes the visit.
    fn record(&self, visit: &Visit) -> Result<()>;

    /// Returns the number of distinct visitors recorded for `page`, or zero
    /// if the page has never been visited.
    fn count(&self, page: &str) -> Result<Count>;
}

/// Synchronization strategy used by a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Strategy {
    /// One reader-writer lock around the whole state.
    #[default]
    Locked,
    /// A single worker thread owning the state and draining a request queue.
    Serialized,
}

impl Strategy {
    /// Builds a store with this strategy and otherwise default settings.
    pub fn build(self) -> Result<Arc<dyn VisitStore>> {
        StoreConfig::new().with_strategy(self).build()
    }
}

/// Construction-time settings for a visit store.
///
/// # Examples
///
/// ```rust
/// use visitatori::store::{StoreConfig, Strategy};
///
/// let config = StoreConfig::new()
///     .with_strategy(Strategy::Serialized)
///     .with_queue_capacity(64);
/// let store = config.build()?;
/// assert_eq!(store.count("url")?, 0);
/// # Ok::<(), visitatori::error::VisitError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StoreConfig {
    /// Which implementation to build.
    pub strategy: Strategy,
    /// Bound of the request queue for [`Strategy::Serialized`]. Zero makes
    /// every request a rendezvous with the worker. Ignored by
    /// [`Strategy::Locked`].
    pub queue_capacity: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Creates an empty store.
    ///
    /// # Errors
    ///
    /// The serialized strategy fails with [`VisitError::Store`](crate::error::VisitError::Store)
    /// if its worker thread cannot be spawned.
    pub fn build(&self) -> Result<Arc<dyn VisitStore>> {
        Ok(match self.strategy {
            Strategy::Locked => Arc::new(LockedStore::new()),
            Strategy::Serialized => Arc::new(SerializedStore::with_capacity(self.queue_capacity)?),
        })
    }
}

/// The state both strategies protect.
#[derive(Debug, Default)]
pub(crate) struct PageVisitors {
    visitors_by_page: HashMap<PageUrl, HashSet<VisitorId>>,
    count_by_page: HashMap<PageUrl, Count>,
}

impl PageVisitors {
    /// Adds the visitor to the page, returning `true` if it was new there.
    pub(crate) fn insert(&mut self, visit: &Visit) -> bool {
        let Some(visitors) = self.visitors_by_page.get_mut(&visit.page) else {
            let visitors = HashSet::from([visit.visitor.clone()]);
            self.visitors_by_page.insert(visit.page.clone(), visitors);
            self.count_by_page.insert(visit.page.clone(), 1);
            trace!(page = %visit.page, visitor = %visit.visitor, "first visit on page");
            return true;
        };

        if !visitors.insert(visit.visitor.clone()) {
            return false;
        }

        let count = visitors.len() as Count;
        match self.count_by_page.get_mut(&visit.page) {
            Some(current) => *current += 1,
            None => {
                self.count_by_page.insert(visit.page.clone(), count);
            }
        }
        debug_assert_eq!(self.count_by_page.get(&visit.page), Some(&count));
        trace!(page = %visit.page, visitor = %visit.visitor, count, "new visitor on page");
        true
    }

    pub(crate) fn count(&self, page: &str) -> Count {
        self.count_by_page.get(page).copied().unwrap_or(0)
    }

    pub(crate) fn pages(&self) -> usize {
        self.count_by_page.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    const STRATEGIES: [Strategy; 2] = [Strategy::Locked, Strategy::Serialized];

    fn record_all(store: &dyn VisitStore, visits: &[(&str, &str)]) {
        for (visitor, page) in visits {
            store.record(&Visit::new(*visitor, *page)).unwrap();
        }
    }

    #[test]
    fn test_page_visitors_insert() {
        let mut state = PageVisitors::default();
        assert!(state.insert(&Visit::new("id", "url")));
        assert!(!state.insert(&Visit::new("id", "url")));
        assert!(state.insert(&Visit::new("id2", "url")));
        assert!(state.insert(&Visit::new("id", "url2")));
        assert_eq!(state.count("url"), 2);
        assert_eq!(state.count("url2"), 1);
        assert_eq!(state.count("url3"), 0);
        assert_eq!(state.pages(), 2);
    }

    #[test]
    fn test_basic_insert_and_count() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            record_all(store.as_ref(), &[("id", "url")]);
            assert_eq!(store.count("url").unwrap(), 1, "{strategy:?}");
        }
    }

    #[test]
    fn test_idempotent_record() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            record_all(store.as_ref(), &[("id", "url"), ("id", "url")]);
            assert_eq!(store.count("url").unwrap(), 1, "{strategy:?}");
        }
    }

    #[test]
    fn test_multiple_visitors() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            record_all(store.as_ref(), &[("id", "url"), ("id2", "url")]);
            assert_eq!(store.count("url").unwrap(), 2, "{strategy:?}");
        }
    }

    #[test]
    fn test_unvisited_page_is_zero() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            assert_eq!(store.count("url").unwrap(), 0, "{strategy:?}");
        }
    }

    #[test]
    fn test_pages_are_isolated() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            record_all(store.as_ref(), &[("id", "url"), ("id2", "url2"), ("id2", "url")]);
            assert_eq!(store.count("url").unwrap(), 2, "{strategy:?}");
            assert_eq!(store.count("url2").unwrap(), 1, "{strategy:?}");

            record_all(store.as_ref(), &[("id3", "url"), ("id4", "url")]);
            assert_eq!(store.count("url2").unwrap(), 1, "{strategy:?}");
        }
    }

    #[test]
    fn test_count_matches_distinct_visitors() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            let mut expected: HashMap<String, HashSet<String>> = HashMap::new();

            for i in 0..500u32 {
                let page = format!("page-{}", i % 7);
                let visitor = format!("visitor-{}", (i * 31) % 45);
                store.record(&Visit::new(visitor.clone(), page.clone())).unwrap();
                expected.entry(page).or_default().insert(visitor);
            }

            for (page, visitors) in &expected {
                assert_eq!(
                    store.count(page).unwrap(),
                    visitors.len() as Count,
                    "{strategy:?} {page}"
                );
            }
        }
    }

    #[test]
    fn test_concurrent_distinct_visitors() {
        const THREADS: usize = 8;
        const PER_THREAD: usize = 250;

        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            let mut handles = vec![];

            for t in 0..THREADS {
                let store = Arc::clone(&store);
                handles.push(thread::spawn(move || {
                    for i in 0..PER_THREAD {
                        let visit = Visit::new(format!("id-{t}-{i}"), "url");
                        store.record(&visit).unwrap();
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(
                store.count("url").unwrap(),
                (THREADS * PER_THREAD) as Count,
                "{strategy:?}"
            );
        }
    }

    #[test]
    fn test_concurrent_same_visitor() {
        const THREADS: usize = 16;

        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();
            let mut handles = vec![];

            for _ in 0..THREADS {
                let store = Arc::clone(&store);
                handles.push(thread::spawn(move || {
                    for _ in 0..100 {
                        store.record(&Visit::new("id", "url")).unwrap();
                    }
                }));
            }

            for handle in handles {
                handle.join().unwrap();
            }

            assert_eq!(store.count("url").unwrap(), 1, "{strategy:?}");
        }
    }

    #[test]
    fn test_concurrent_reads_never_decrease() {
        for strategy in STRATEGIES {
            let store = strategy.build().unwrap();

            let writer = {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    for i in 0..1000 {
                        store.record(&Visit::new(format!("id-{i}"), "url")).unwrap();
                    }
                })
            };

            let reader = {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let mut last = 0;
                    for _ in 0..1000 {
                        let current = store.count("url").unwrap();
                        assert!(current >= last);
                        last = current;
                    }
                })
            };

            writer.join().unwrap();
            reader.join().unwrap();
            assert_eq!(store.count("url").unwrap(), 1000, "{strategy:?}");
        }
    }

    #[test]
    fn test_store_config_default() {
        let config = StoreConfig::default();
        assert_eq!(config.strategy, Strategy::Locked);
        assert_eq!(config.queue_capacity, DEFAULT_QUEUE_CAPACITY);
    }

    #[test]
    fn test_rendezvous_queue() {
        let store = StoreConfig::new()
            .with_strategy(Strategy::Serialized)
            .with_queue_capacity(0)
            .build()
            .unwrap();
        record_all(store.as_ref(), &[("id", "url"), ("id2", "url")]);
        assert_eq!(store.count("url").unwrap(), 2);
    }
}
