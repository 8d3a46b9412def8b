//! Error types shared across the emblem pipeline.

use thiserror::Error;

/// A base or candidate location that cannot form a valid absolute URL.
///
/// Fatal to link discovery for the affected document. Per-element hrefs are
/// subject to the discovery policy in `emblem-links`, which may downgrade
/// this to a skipped entry.
#[derive(Debug, Error)]
#[error("cannot form an absolute URL from '{input}': {source}")]
pub struct MalformedLocation {
    /// The input that failed to parse or resolve.
    pub input: String,
    /// The underlying parser error.
    pub source: url::ParseError,
}

/// A transport-level failure fetching a resource.
///
/// Candidates that fail with this are dropped by the pipeline, not retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    #[error("failed to create HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request failed before a response arrived.
    #[error("request for '{url}' failed: {source}")]
    Request {
        /// The URL that was being fetched.
        url: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("HTTP error fetching '{url}': {status}")]
    Status {
        /// The URL that was being fetched.
        url: String,
        /// The response status code.
        status: reqwest::StatusCode,
    },

    /// The response body could not be read or decoded.
    #[error("failed to read response body from '{url}': {source}")]
    Body {
        /// The URL that was being fetched.
        url: String,
        /// The underlying transport error.
        source: reqwest::Error,
    },

    /// A local file read failed.
    #[error("failed to read '{path}': {source}")]
    File {
        /// The local path that was being read.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A `data:` URL payload could not be decoded.
    #[error("invalid data URL: {0}")]
    DataUrl(String),

    /// The URL scheme is not one the fetcher understands.
    #[error("unsupported URL scheme '{0}'")]
    Scheme(String),
}
