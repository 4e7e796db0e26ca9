//! Domain values shared by the store, the catalog and the services.

use std::fmt::{self, Display};

use crate::error::{Result, VisitError};

/// Opaque identifier of a page.
pub type PageUrl = String;

/// Opaque identifier of a visitor.
pub type VisitorId = String;

/// Number of distinct visitors observed on a page.
pub type Count = u64;

/// One navigation event: `visitor` opened `page`.
///
/// # Examples
///
/// ```rust
/// use visitatori::visit::Visit;
///
/// let visit = Visit::new("id", "url");
/// assert_eq!(visit.visitor, "id");
/// assert_eq!(visit.page, "url");
/// assert!(visit.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    pub visitor: VisitorId,
    pub page: PageUrl,
}

impl Visit {
    pub fn new(visitor: impl Into<VisitorId>, page: impl Into<PageUrl>) -> Self {
        Self {
            visitor: visitor.into(),
            page: page.into(),
        }
    }

    /// Checks that both identifiers are non-empty.
    ///
    /// This is the only structural validation the crate performs. It is meant
    /// for the code decoding visits from the outside world; the services and
    /// stores accept whatever they are given.
    pub fn validate(&self) -> Result<()> {
        if self.visitor.is_empty() {
            return Err(VisitError::EmptyField("visitor"));
        }
        if self.page.is_empty() {
            return Err(VisitError::EmptyField("page"));
        }
        Ok(())
    }
}

impl Display for Visit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.visitor, self.page)
    }
}
