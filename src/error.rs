//! Error type shared by the store, the catalog and the services.
//!
//! Every layer returns [`VisitError`] and passes lower-layer errors through
//! untouched. The only error introduced above the store is
//! [`VisitError::PageNotFound`], raised by the services when the catalog does
//! not know the page.
//!
//! # Example
//!
//! ```rust
//! use visitatori::error::VisitError;
//!
//! let err = VisitError::PageNotFound("url".to_string());
//! assert!(err.is_page_not_found());
//! assert_eq!(err.to_string(), "page not found: url");
//! ```

use thiserror::Error;

use crate::visit::PageUrl;

/// Boxed source error carried by collaborator and store failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum VisitError {
    /// The page is not part of the catalog.
    #[error("page not found: {0}")]
    PageNotFound(PageUrl),

    /// The catalog could not answer the existence check.
    #[error("catalog lookup failed: {0}")]
    Catalog(#[source] BoxError),

    /// The visit store could not complete the operation.
    #[error("visit store failure: {0}")]
    Store(#[source] BoxError),

    /// A visit carried an empty identifier.
    #[error("missing field: {0}")]
    EmptyField(&'static str),
}

impl VisitError {
    /// Wraps an arbitrary error as a catalog failure.
    pub fn catalog(err: impl Into<BoxError>) -> Self {
        VisitError::Catalog(err.into())
    }

    /// Wraps an arbitrary error as a store failure.
    pub fn store(err: impl Into<BoxError>) -> Self {
        VisitError::Store(err.into())
    }

    pub fn is_page_not_found(&self) -> bool {
        matches!(self, VisitError::PageNotFound(_))
    }
}

/// Result type for all visit operations.
pub type Result<T> = std::result::Result<T, VisitError>;
