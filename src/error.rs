//! Defines [`ArcGisError`], representing all errors returned by this crate.

use std::fmt::Debug;
use thiserror::Error;

/// Enum with all errors in this crate.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum ArcGisError {
    /// A request did not complete with a success status.
    #[error("Request to {url} failed: {status}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Status line or transport failure description.
        status: String,
    },

    /// A document was delivered but carries an ArcGIS `error` object.
    #[error("{context}: {message}")]
    Service {
        /// What was being fetched, e.g. `Feature Server Error`.
        context: String,
        /// The `error.message` reported by the server.
        message: String,
    },

    /// A document is missing required fields or does not decode.
    #[error("{0}")]
    Format(String),

    /// Export to a format that is not implemented.
    #[error("{0}")]
    UnsupportedFormat(String),

    /// A portal item type that layer resolution does not handle.
    #[error("Unsupported item type: {0}")]
    UnsupportedItemType(String),

    /// The input is not an ArcGIS service, layer or item URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// There is no feature data to export.
    #[error("No data to export")]
    NoData,

    /// [reqwest::Error]
    #[cfg(feature = "http")]
    #[error(transparent)]
    Http(#[from] reqwest::Error),

    /// [geozero::error::GeozeroError]
    #[cfg(feature = "geozero")]
    #[error(transparent)]
    GeozeroError(#[from] geozero::error::GeozeroError),

    /// [tokio::task::JoinError]
    #[cfg(feature = "worker")]
    #[error("Background worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    /// [std::fmt::Error]
    #[error(transparent)]
    FmtError(#[from] std::fmt::Error),

    /// [std::io::Error]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// [serde_json::Error]
    #[error(transparent)]
    SerdeJsonError(#[from] serde_json::Error),

    /// [url::ParseError]
    #[error(transparent)]
    UrlError(#[from] url::ParseError),
}

/// Crate-specific result type.
pub type Result<T> = std::result::Result<T, ArcGisError>;
