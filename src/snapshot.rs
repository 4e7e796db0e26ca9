//! Point-in-time reports of unique visitors per page.
//!
//! A [`VisitsSnapshot`] is what the observers render. It is collected through
//! [`VisitorCountService`], one page at a time, so every entry is consistent
//! on its own but the snapshot as a whole is not an atomic cut across pages.
//!
//! With the `serde` feature both types serialize with any serde format.
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use visitatori::catalog::InMemoryCatalog;
//! use visitatori::service::Services;
//! use visitatori::snapshot::VisitsSnapshot;
//! use visitatori::store::Strategy;
//! use visitatori::visit::Visit;
//!
//! let catalog = Arc::new(InMemoryCatalog::new(["/a", "/b"]));
//! let services = Services::new(Strategy::Locked.build()?, catalog.clone());
//! services.navigation.record_navigation(&Visit::new("id", "/a"))?;
//!
//! let snapshot = VisitsSnapshot::collect(&services.visitor_count, catalog.pages())?;
//! assert_eq!(snapshot.get("/a").map(|p| p.unique_visitors), Some(1));
//! assert_eq!(snapshot.get("/b").map(|p| p.unique_visitors), Some(0));
//! # Ok::<(), visitatori::error::VisitError>(())
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::Result;
use crate::service::VisitorCountService;
use crate::visit::{Count, PageUrl};

/// The unique-visitor count of one page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSnapshot {
    pub page: PageUrl,
    pub unique_visitors: Count,
}

impl PageSnapshot {
    pub fn new(page: impl Into<PageUrl>, unique_visitors: Count) -> Self {
        Self {
            page: page.into(),
            unique_visitors,
        }
    }
}

/// Unique-visitor counts for a set of pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VisitsSnapshot {
    /// Optional timestamp in milliseconds since Unix epoch.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none", default))]
    pub timestamp_ms: Option<u64>,
    pub pages: Vec<PageSnapshot>,
}

impl VisitsSnapshot {
    pub fn new(pages: Vec<PageSnapshot>) -> Self {
        Self {
            timestamp_ms: None,
            pages,
        }
    }

    pub fn with_timestamp(pages: Vec<PageSnapshot>, timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms: Some(timestamp_ms),
            pages,
        }
    }

    /// Queries `service` for every page in `pages`.
    ///
    /// # Errors
    ///
    /// Stops at the first failing page, including
    /// [`VisitError::PageNotFound`](crate::error::VisitError::PageNotFound)
    /// for pages the service's catalog does not know.
    pub fn collect<'a>(
        service: &VisitorCountService,
        pages: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self> {
        let pages = pages
            .into_iter()
            .map(|page| {
                service
                    .count_unique_visitors(page)
                    .map(|count| PageSnapshot::new(page, count))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new(pages))
    }

    /// Sets the timestamp to the current wall-clock time.
    pub fn stamped(mut self) -> Self {
        self.timestamp_ms = Some(now_ms());
        self
    }

    /// Finds a page by identifier.
    pub fn get(&self, page: &str) -> Option<&PageSnapshot> {
        self.pages.iter().find(|p| p.page == page)
    }

    /// Sum of the unique visitors of every page.
    pub fn total(&self) -> Count {
        self.pages.iter().map(|p| p.unique_visitors).sum()
    }
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
