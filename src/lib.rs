//! # Visitatori - Unique Visitors per Page
//!
//! A Rust library that records page visits and answers, for any page, how
//! many distinct visitors have seen it. The heart of the crate is a visit
//! store that stays consistent under any number of concurrent writers and
//! readers while keeping count queries O(1).
//!
//! ## The Problem
//!
//! Counting unique visitors needs a check-then-act sequence: is there a
//! visitor set for this page, is this visitor already in it, and if not,
//! add it and bump the counter. Run concurrently without care, two requests
//! for the same new visitor both believe they are first and the counter
//! drifts away from the real set size.
//!
//! ## Design
//!
//! 1. **Per-page visitor sets plus a counter**: each visited page keeps the
//!    set of visitors seen so far and its precomputed size, so reading a
//!    count never walks the set.
//!
//! 2. **Atomic check-and-insert**: the whole sequence runs as one critical
//!    section. After any call returns, every page's counter equals the size
//!    of its visitor set, and counters never decrease.
//!
//! 3. **Two interchangeable strategies** behind the
//!    [`VisitStore`](store::VisitStore) trait:
//!    - [`Strategy::Locked`](store::Strategy::Locked): one reader-writer lock,
//!      reads run in parallel. The default.
//!    - [`Strategy::Serialized`](store::Strategy::Serialized): a single worker
//!      thread owns the state and drains a request queue.
//!
//! 4. **Catalog-gated services**: [`NavigationService`](service::NavigationService)
//!    and [`VisitorCountService`](service::VisitorCountService) refuse pages the
//!    [`PageCatalog`](catalog::PageCatalog) does not know, so "unknown page" and
//!    "zero visitors" stay distinguishable.
//!
//! ```text
//!   record_navigation ─┐                     ┌─► record ─┐
//!                      ├─► catalog.exists ───┤           ├─► VisitStore
//!   count_unique ──────┘    (PageNotFound)   └─► count ──┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use visitatori::catalog::InMemoryCatalog;
//! use visitatori::service::Services;
//! use visitatori::store::Strategy;
//! use visitatori::visit::Visit;
//!
//! let catalog = Arc::new(InMemoryCatalog::new(["/home", "/about"]));
//! let services = Services::new(Strategy::default().build()?, catalog);
//!
//! services.navigation.record_navigation(&Visit::new("alice", "/home"))?;
//! services.navigation.record_navigation(&Visit::new("alice", "/home"))?;
//! services.navigation.record_navigation(&Visit::new("bob", "/home"))?;
//!
//! assert_eq!(services.visitor_count.count_unique_visitors("/home")?, 2);
//! assert_eq!(services.visitor_count.count_unique_visitors("/about")?, 0);
//! assert!(services
//!     .visitor_count
//!     .count_unique_visitors("/missing")
//!     .unwrap_err()
//!     .is_page_not_found());
//! # Ok::<(), visitatori::error::VisitError>(())
//! ```
//!
//! ## Thread Safety
//!
//! Stores, catalogs and services are `Send + Sync`. Services are cheap to
//! clone: they hold `Arc` handles to the shared store and catalog.
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (`trace` for state changes, `debug` for
//! the serialized worker's lifecycle) and never installs a subscriber.
//!
//! ## Observers
//!
//! Optional observers render a [`VisitsSnapshot`](snapshot::VisitsSnapshot),
//! each gated behind a feature flag:
//!
//! | Feature | Module | Description |
//! |---------|--------|-------------|
//! | `table` | [`observers::table`] | Pretty-print visitors per page as a table |
//! | `json` | [`observers::json`] | Serialize the snapshot to JSON |
//! | `prometheus` | [`observers::prometheus`] | Export a Prometheus gauge per page |
//! | `full` | All observers | Enables all observer modules |

pub mod catalog;
pub mod error;
pub mod observers;
pub mod service;
pub mod snapshot;
pub mod store;
pub mod visit;

pub use error::{Result, VisitError};
