//! Error types for constructing a GM client

use thiserror::Error;

/// Result type alias for GM client construction
pub type Result<T> = std::result::Result<T, GmClientError>;

/// Errors that can occur while building a [`GmClient`](crate::GmClient).
///
/// Failures of the upstream calls themselves are reported as
/// [`smartcar_core::VehicleError`].
#[derive(Error, Debug)]
pub enum GmClientError {
    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Invalid base URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Base URL cannot carry a path (e.g. `mailto:`)
    #[error("Base URL cannot be used for HTTP requests: {0}")]
    UnsupportedBaseUrl(String),

    /// IO error (test server bind)
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}
