//! Business rules in front of the visit store.
//!
//! Both services check the page against the catalog before touching the
//! store. An unknown page is reported as
//! [`VisitError::PageNotFound`](crate::error::VisitError::PageNotFound) and
//! the store is never called; any error from the catalog or the store is
//! returned as is.
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use visitatori::catalog::InMemoryCatalog;
//! use visitatori::service::Services;
//! use visitatori::store::Strategy;
//! use visitatori::visit::Visit;
//!
//! let catalog = Arc::new(InMemoryCatalog::new(["url"]));
//! let services = Services::new(Strategy::Locked.build()?, catalog);
//!
//! services.navigation.record_navigation(&Visit::new("id", "url"))?;
//! assert_eq!(services.visitor_count.count_unique_visitors("url")?, 1);
//!
//! let err = services.visitor_count.count_unique_visitors("other").unwrap_err();
//! assert!(err.is_page_not_found());
//! # Ok::<(), visitatori::error::VisitError>(())
//! ```

use std::sync::Arc;

use crate::catalog::PageCatalog;
use crate::error::{Result, VisitError};
use crate::store::VisitStore;
use crate::visit::{Count, Visit};

/// Fails with `PageNotFound` unless the catalog knows `page`.
fn ensure_page_exists(catalog: &dyn PageCatalog, page: &str) -> Result<()> {
    if catalog.exists(page)? {
        Ok(())
    } else {
        Err(VisitError::PageNotFound(page.to_string()))
    }
}

/// Records visits on known pages.
#[derive(Debug, Clone)]
pub struct NavigationService {
    store: Arc<dyn VisitStore>,
    catalog: Arc<dyn PageCatalog>,
}

impl NavigationService {
    pub fn new(store: Arc<dyn VisitStore>, catalog: Arc<dyn PageCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Records `visit` if its page is in the catalog.
    ///
    /// # Errors
    ///
    /// - [`VisitError::PageNotFound`] if the page is unknown; nothing is recorded.
    /// - Any error from the catalog or the store, unchanged.
    pub fn record_navigation(&self, visit: &Visit) -> Result<()> {
        ensure_page_exists(self.catalog.as_ref(), &visit.page)?;
        self.store.record(visit)
    }
}

/// Answers unique-visitor queries for known pages.
#[derive(Debug, Clone)]
pub struct VisitorCountService {
    store: Arc<dyn VisitStore>,
    catalog: Arc<dyn PageCatalog>,
}

impl VisitorCountService {
    pub fn new(store: Arc<dyn VisitStore>, catalog: Arc<dyn PageCatalog>) -> Self {
        Self { store, catalog }
    }

    /// Returns the number of distinct visitors of `page`.
    ///
    /// A known page nobody visited yields `Ok(0)`; an unknown page yields
    /// [`VisitError::PageNotFound`], never zero.
    pub fn count_unique_visitors(&self, page: &str) -> Result<Count> {
        ensure_page_exists(self.catalog.as_ref(), page)?;
        self.store.count(page)
    }
}

/// Both services wired to the same store and catalog.
#[derive(Debug, Clone)]
pub struct Services {
    pub navigation: NavigationService,
    pub visitor_count: VisitorCountService,
}

impl Services {
    pub fn new(store: Arc<dyn VisitStore>, catalog: Arc<dyn PageCatalog>) -> Self {
        Self {
            navigation: NavigationService::new(Arc::clone(&store), Arc::clone(&catalog)),
            visitor_count: VisitorCountService::new(store, catalog),
        }
    }
}
