//! JSON observer for serializing unique-visitor snapshots.
//!
//! This module provides [`JsonObserver`], which serializes a
//! [`VisitsSnapshot`] to JSON using serde.
//!
//! # Feature Flag
//!
//! This module requires the `json` feature:
//!
//! ```toml
//! [dependencies]
//! visitatori = { version = "0.1", features = ["json"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use visitatori::observers::json::JsonObserver;
//! use visitatori::snapshot::{PageSnapshot, VisitsSnapshot};
//!
//! let snapshot = VisitsSnapshot::new(vec![
//!     PageSnapshot::new("/home", 120),
//!     PageSnapshot::new("/about", 7),
//! ]);
//!
//! let json = JsonObserver::new().to_json(&snapshot).unwrap();
//! assert_eq!(
//!     json,
//!     r#"[{"page":"/home","unique_visitors":120},{"page":"/about","unique_visitors":7}]"#
//! );
//! ```

use crate::observers::Result;
use crate::snapshot::VisitsSnapshot;

/// Configuration for the JSON observer.
#[derive(Debug, Clone, Default)]
pub struct JsonConfig {
    /// Whether to pretty-print the JSON output.
    pub pretty: bool,
    /// Whether to include a timestamp in the output.
    pub include_timestamp: bool,
    /// Whether to emit the whole snapshot object instead of the bare page array.
    pub wrap_in_snapshot: bool,
}

/// An observer that serializes snapshots to JSON.
///
/// Wrapped output with a timestamp:
///
/// ```rust
/// use visitatori::observers::json::JsonObserver;
/// use visitatori::snapshot::VisitsSnapshot;
///
/// let json = JsonObserver::new()
///     .wrap_in_snapshot(true)
///     .include_timestamp(true)
///     .to_json(&VisitsSnapshot::default())
///     .unwrap();
/// assert!(json.starts_with(r#"{"timestamp_ms":"#));
/// ```
#[derive(Debug, Clone, Default)]
pub struct JsonObserver {
    config: JsonConfig,
}

impl JsonObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JsonConfig) -> Self {
        Self { config }
    }

    /// Enables or disables pretty-printing.
    pub fn pretty(mut self, enabled: bool) -> Self {
        self.config.pretty = enabled;
        self
    }

    /// Enables or disables timestamp inclusion.
    ///
    /// Only has effect when `wrap_in_snapshot` is also enabled. A snapshot
    /// that already carries a timestamp keeps it.
    pub fn include_timestamp(mut self, enabled: bool) -> Self {
        self.config.include_timestamp = enabled;
        self
    }

    /// Enables or disables wrapping the output in the snapshot object.
    pub fn wrap_in_snapshot(mut self, enabled: bool) -> Self {
        self.config.wrap_in_snapshot = enabled;
        self
    }

    /// Serializes `snapshot` according to the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ObserverError::Json`](crate::observers::ObserverError::Json)
    /// if serialization fails.
    pub fn to_json(&self, snapshot: &VisitsSnapshot) -> Result<String> {
        if !self.config.wrap_in_snapshot {
            return self.serialize(&snapshot.pages);
        }

        if self.config.include_timestamp && snapshot.timestamp_ms.is_none() {
            self.serialize(&snapshot.clone().stamped())
        } else if !self.config.include_timestamp && snapshot.timestamp_ms.is_some() {
            let mut untimed = snapshot.clone();
            untimed.timestamp_ms = None;
            self.serialize(&untimed)
        } else {
            self.serialize(snapshot)
        }
    }

    /// Serializes `snapshot` to bytes (useful for HTTP responses).
    pub fn to_json_bytes(&self, snapshot: &VisitsSnapshot) -> Result<Vec<u8>> {
        Ok(self.to_json(snapshot)?.into_bytes())
    }

    fn serialize<T: serde::Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        let json = if self.config.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::PageSnapshot;

    fn snapshot() -> VisitsSnapshot {
        VisitsSnapshot::new(vec![PageSnapshot::new("/a", 3)])
    }

    #[test]
    fn test_bare_array() {
        let json = JsonObserver::new().to_json(&snapshot()).unwrap();
        assert_eq!(json, r#"[{"page":"/a","unique_visitors":3}]"#);
    }

    #[test]
    fn test_wrapped_without_timestamp() {
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .to_json(&VisitsSnapshot::with_timestamp(snapshot().pages, 42))
            .unwrap();
        assert_eq!(json, r#"{"pages":[{"page":"/a","unique_visitors":3}]}"#);
    }

    #[test]
    fn test_wrapped_keeps_existing_timestamp() {
        let json = JsonObserver::new()
            .wrap_in_snapshot(true)
            .include_timestamp(true)
            .to_json(&VisitsSnapshot::with_timestamp(snapshot().pages, 42))
            .unwrap();
        assert_eq!(
            json,
            r#"{"timestamp_ms":42,"pages":[{"page":"/a","unique_visitors":3}]}"#
        );
    }

    #[test]
    fn test_pretty() {
        let json = JsonObserver::new().pretty(true).to_json(&snapshot()).unwrap();
        assert!(json.contains('\n'));
        assert!(json.contains("\"unique_visitors\": 3"));
    }

    #[test]
    fn test_bytes() {
        let bytes = JsonObserver::new().to_json_bytes(&snapshot()).unwrap();
        assert_eq!(bytes, br#"[{"page":"/a","unique_visitors":3}]"#.to_vec());
    }
}
