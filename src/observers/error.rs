//! Error type for all observers.

use thiserror::Error;

/// Unified error type for observer rendering.
#[derive(Debug, Error)]
pub enum ObserverError {
    /// Error from the JSON observer.
    #[cfg(feature = "json")]
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error creating, registering or encoding a Prometheus metric.
    #[cfg(feature = "prometheus")]
    #[error("prometheus error: {0}")]
    Prometheus(#[from] prometheus::Error),

    /// Error encoding to UTF-8.
    #[error("utf8 error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Result type for observer operations.
pub type Result<T> = std::result::Result<T, ObserverError>;
