//! Prometheus observer for exporting unique visitors per page.
//!
//! This module provides [`PrometheusObserver`], which turns a
//! [`VisitsSnapshot`] into a labelled gauge and renders it with the official
//! `prometheus` crate's [`TextEncoder`].
//!
//! # Feature Flag
//!
//! This module requires the `prometheus` feature:
//!
//! ```toml
//! [dependencies]
//! visitatori = { version = "0.1", features = ["prometheus"] }
//! ```
//!
//! # Examples
//!
//! ```rust
//! use visitatori::observers::prometheus::PrometheusObserver;
//! use visitatori::snapshot::{PageSnapshot, VisitsSnapshot};
//!
//! let snapshot = VisitsSnapshot::new(vec![PageSnapshot::new("/home", 120)]);
//!
//! let output = PrometheusObserver::new()
//!     .with_namespace("site")
//!     .render(&snapshot)?;
//! assert!(output.contains(r#"site_unique_visitors{page="/home"} 120"#));
//! # Ok::<(), visitatori::observers::ObserverError>(())
//! ```

use std::collections::HashMap;

use prometheus::{Encoder, IntGaugeVec, Opts, Registry, TextEncoder};

use crate::observers::Result;
use crate::snapshot::VisitsSnapshot;

const DEFAULT_METRIC_NAME: &str = "unique_visitors";
const DEFAULT_HELP: &str = "Number of distinct visitors per page";
const PAGE_LABEL: &str = "page";

/// Observer that exports snapshots in the Prometheus exposition format.
#[derive(Debug, Clone)]
pub struct PrometheusObserver {
    /// Namespace (prefix) for the metric.
    namespace: Option<String>,
    /// Subsystem for the metric.
    subsystem: Option<String>,
    name: String,
    help: String,
    /// Constant labels applied to every sample.
    const_labels: HashMap<String, String>,
}

impl Default for PrometheusObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl PrometheusObserver {
    pub fn new() -> Self {
        Self {
            namespace: None,
            subsystem: None,
            name: DEFAULT_METRIC_NAME.to_string(),
            help: DEFAULT_HELP.to_string(),
            const_labels: HashMap::new(),
        }
    }

    /// Sets the namespace (prefix) of the metric.
    ///
    /// For example, namespace "site" + metric "unique_visitors" = "site_unique_visitors".
    pub fn with_namespace(mut self, namespace: &str) -> Self {
        self.namespace = Some(namespace.to_string());
        self
    }

    /// Sets the subsystem, placed between namespace and metric name.
    pub fn with_subsystem(mut self, subsystem: &str) -> Self {
        self.subsystem = Some(subsystem.to_string());
        self
    }

    /// Overrides the metric name (`unique_visitors` by default).
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Self::sanitize_name(name);
        self
    }

    pub fn with_help(mut self, help: &str) -> Self {
        self.help = help.to_string();
        self
    }

    /// Adds a constant label to every sample.
    pub fn with_const_label(mut self, name: &str, value: &str) -> Self {
        self.const_labels.insert(name.to_string(), value.to_string());
        self
    }

    /// Sanitizes a metric name to be Prometheus-compatible.
    ///
    /// Prometheus metric names must match `[a-zA-Z_:][a-zA-Z0-9_:]*`.
    fn sanitize_name(name: &str) -> String {
        let mut result: String = name
            .chars()
            .filter_map(|c| match c {
                c if c.is_ascii_alphanumeric() || c == '_' || c == ':' => Some(c),
                '-' | '.' | ' ' | '/' => Some('_'),
                _ => None,
            })
            .collect();
        if result.is_empty() {
            result.push_str(DEFAULT_METRIC_NAME);
        }
        if result.starts_with(|c: char| c.is_ascii_digit()) {
            result.insert(0, '_');
        }
        result
    }

    fn opts(&self) -> Opts {
        let mut opts = Opts::new(self.name.clone(), self.help.clone())
            .const_labels(self.const_labels.clone());
        if let Some(ns) = &self.namespace {
            opts = opts.namespace(ns.clone());
        }
        if let Some(ss) = &self.subsystem {
            opts = opts.subsystem(ss.clone());
        }
        opts
    }

    /// Renders `snapshot` to Prometheus exposition format.
    ///
    /// A fresh registry is built for each render.
    ///
    /// # Errors
    ///
    /// Returns an error if metric creation, registration, or encoding fails.
    pub fn render(&self, snapshot: &VisitsSnapshot) -> Result<String> {
        let registry = Registry::new();
        let gauge = IntGaugeVec::new(self.opts(), &[PAGE_LABEL])?;
        registry.register(Box::new(gauge.clone()))?;

        for page in &snapshot.pages {
            let value = i64::try_from(page.unique_visitors).unwrap_or(i64::MAX);
            gauge.with_label_values(&[page.page.as_str()]).set(value);
        }

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buffer)?;
        Ok(String::from_utf8(buffer)?)
    }

    /// Renders `snapshot` to bytes (useful for HTTP responses).
    pub fn render_bytes(&self, snapshot: &VisitsSnapshot) -> Result<Vec<u8>> {
        Ok(self.render(snapshot)?.into_bytes())
    }
}
