//! The set of pages visits may be recorded against.
//!
//! The services only need [`PageCatalog::exists`]; [`InMemoryCatalog`] is the
//! implementation used in practice, built once from an already loaded list
//! of pages and read-only afterwards.
//!
//! # Loading
//!
//! [`InMemoryCatalog::from_reader`] and [`InMemoryCatalog::from_path`] read one
//! page per line and skip empty lines:
//!
//! ```rust
//! use visitatori::catalog::{InMemoryCatalog, PageCatalog};
//!
//! let catalog = InMemoryCatalog::from_reader("/home\n\n/about\n".as_bytes())?;
//! assert_eq!(catalog.len(), 2);
//! assert!(catalog.exists("/about").unwrap());
//! assert!(!catalog.exists("").unwrap());
//! # Ok::<(), std::io::Error>(())
//! ```

use std::collections::BTreeSet;
use std::fmt::Debug;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::visit::PageUrl;

/// Answers whether a page is known.
///
/// The in-memory catalog never fails; the `Result` leaves room for backends
/// that can (a remote catalog, for instance). A failure must be reported as
/// [`VisitError::Catalog`](crate::error::VisitError::Catalog), never as a
/// missing page.
pub trait PageCatalog: Send + Sync + Debug {
    fn exists(&self, page: &str) -> Result<bool>;
}

/// An immutable set of known pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InMemoryCatalog {
    pages: BTreeSet<PageUrl>,
}

impl InMemoryCatalog {
    /// Builds a catalog from any collection of page identifiers. Duplicates
    /// collapse into one entry.
    pub fn new<I, P>(pages: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PageUrl>,
    {
        pages.into_iter().collect()
    }

    /// Reads one page per line. Empty lines are skipped.
    pub fn from_reader(reader: impl BufRead) -> io::Result<Self> {
        let mut pages = BTreeSet::new();
        for line in reader.lines() {
            let line = line?;
            let page = line.trim_end_matches('\r');
            if !page.is_empty() {
                pages.insert(page.to_string());
            }
        }
        Ok(Self { pages })
    }

    /// Reads a catalog file; see [`from_reader`](Self::from_reader).
    pub fn from_path(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Iterates over the known pages in lexicographic order.
    pub fn pages(&self) -> impl Iterator<Item = &str> + '_ {
        self.pages.iter().map(String::as_str)
    }
}

impl<P: Into<PageUrl>> FromIterator<P> for InMemoryCatalog {
    fn from_iter<I: IntoIterator<Item = P>>(iter: I) -> Self {
        Self {
            pages: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl PageCatalog for InMemoryCatalog {
    fn exists(&self, page: &str) -> Result<bool> {
        Ok(self.pages.contains(page))
    }
}
