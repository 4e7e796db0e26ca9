//! Observers rendering a [`VisitsSnapshot`](crate::snapshot::VisitsSnapshot).
//!
//! - [`table`] - Pretty-print unique visitors per page using the `tabled` crate
//! - [`json`] - Serialize the snapshot to JSON
//! - [`prometheus`] - Export a `unique_visitors{page="..."}` gauge in Prometheus text format
//!
//! # Feature Flags
//!
//! Each observer is gated behind a feature flag to minimize dependencies:
//!
//! - `table` - Enables the [`table`] module
//! - `json` - Enables the [`json`] module
//! - `prometheus` - Enables the [`prometheus`] module
//! - `full` - Enables all observer modules
//!
//! # Example
//!
//! ```rust,ignore
//! use visitatori::observers::Result;
//! use visitatori::snapshot::VisitsSnapshot;
//!
//! fn export(snapshot: &VisitsSnapshot) -> Result<()> {
//!     #[cfg(feature = "prometheus")]
//!     {
//!         use visitatori::observers::prometheus::PrometheusObserver;
//!         println!("{}", PrometheusObserver::new().render(snapshot)?);
//!     }
//!
//!     #[cfg(feature = "json")]
//!     {
//!         use visitatori::observers::json::JsonObserver;
//!         println!("{}", JsonObserver::new().pretty(true).to_json(snapshot)?);
//!     }
//!
//!     Ok(())
//! }
//! ```

mod error;

pub use error::{ObserverError, Result};

#[cfg(feature = "table")]
pub mod table;

#[cfg(feature = "json")]
pub mod json;

#[cfg(feature = "prometheus")]
pub mod prometheus;
