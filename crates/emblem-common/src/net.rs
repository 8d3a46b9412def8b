//! Blocking fetch for documents and icon resources.
//!
//! Wraps the three resource schemes the pipeline understands - `http(s)`,
//! `data:`, and local `file:` paths - behind a pair of byte/text fetch
//! functions. All network I/O blocks the calling thread; timeouts live
//! here, retries do not exist anywhere.

use crate::error::FetchError;
use base64::Engine;
use std::time::Duration;
use url::Url;

/// User-Agent header sent with all requests.
///
/// Mimics a common desktop browser to avoid basic bot detection.
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// Whether a URL points at the local filesystem.
///
/// True when the scheme is `file` and the host is empty or `localhost`.
#[must_use]
pub fn is_local(url: &Url) -> bool {
    let host_is_local = matches!(url.host_str(), None | Some("" | "localhost"));
    url.scheme() == "file" && host_is_local
}

/// A `data:` URL that can be decoded into raw bytes.
///
/// Only base64-encoded payloads are supported; favicons inlined into HTML
/// overwhelmingly use them.
pub struct DataUrl {
    /// The full raw `data:` URL string (e.g. `data:image/png;base64,...`).
    raw: String,
}

impl DataUrl {
    /// Create a new `DataUrl` from a raw data URL string.
    #[must_use]
    pub const fn new(raw: String) -> Self {
        Self { raw }
    }

    /// Decode the data URL payload into raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::DataUrl`] when the URL has no payload
    /// separator, uses an encoding other than base64, or the base64 payload
    /// is invalid.
    pub fn decode(&self) -> Result<Vec<u8>, FetchError> {
        let data_url = self.raw.trim_start_matches("data:");
        let Some((metadata, data)) = data_url.split_once(',') else {
            return Err(FetchError::DataUrl("missing comma".to_string()));
        };

        if metadata.ends_with(";base64") {
            base64::engine::general_purpose::STANDARD
                .decode(data)
                .map_err(|e| FetchError::DataUrl(format!("base64 decode error: {e}")))
        } else {
            Err(FetchError::DataUrl(format!(
                "unrecognized encoding: {metadata}"
            )))
        }
    }
}

/// Build the blocking HTTP client used by all fetches.
fn client() -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .timeout(TIMEOUT)
        .build()
        .map_err(FetchError::Client)
}

/// Fetch an HTTP(S) URL and return its body as text.
///
/// # Errors
///
/// Returns [`FetchError`] if the client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be
/// decoded.
pub fn fetch_text(url: &str) -> Result<String, FetchError> {
    let response = send(url)?;
    response.text().map_err(|source| FetchError::Body {
        url: url.to_string(),
        source,
    })
}

/// Fetch an HTTP(S) URL and return its body as raw bytes.
///
/// # Errors
///
/// Returns [`FetchError`] if the client cannot be created, the request
/// fails, the response has a non-success status, or the body cannot be
/// read.
pub fn fetch_http_bytes(url: &str) -> Result<Vec<u8>, FetchError> {
    let response = send(url)?;
    response
        .bytes()
        .map(|b| b.to_vec())
        .map_err(|source| FetchError::Body {
            url: url.to_string(),
            source,
        })
}

/// Issue a GET and check the response status.
fn send(url: &str) -> Result<reqwest::blocking::Response, FetchError> {
    let response = client()?
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|source| FetchError::Request {
            url: url.to_string(),
            source,
        })?;

    if !response.status().is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status: response.status(),
        });
    }
    Ok(response)
}

/// Fetch the bytes behind any supported URL scheme.
///
/// Consolidates the three-way fetch (HTTP, data URL, local file) into one
/// function.
///
/// # Errors
///
/// Returns [`FetchError`] on transport failure or an unsupported scheme.
pub fn fetch_bytes(url: &Url) -> Result<Vec<u8>, FetchError> {
    match url.scheme() {
        "http" | "https" => fetch_http_bytes(url.as_str()),
        "data" => DataUrl::new(url.as_str().to_string()).decode(),
        "file" if is_local(url) => {
            let path = local_path(url)?;
            std::fs::read(&path).map_err(|source| FetchError::File {
                path: path.display().to_string(),
                source,
            })
        }
        other => Err(FetchError::Scheme(other.to_string())),
    }
}

/// Fetch a document body as text from an HTTP(S) or local `file:` URL.
///
/// # Errors
///
/// Returns [`FetchError`] on transport failure or an unsupported scheme.
pub fn fetch_document(url: &Url) -> Result<String, FetchError> {
    match url.scheme() {
        "http" | "https" => fetch_text(url.as_str()),
        "file" if is_local(url) => {
            let path = local_path(url)?;
            std::fs::read_to_string(&path).map_err(|source| FetchError::File {
                path: path.display().to_string(),
                source,
            })
        }
        other => Err(FetchError::Scheme(other.to_string())),
    }
}

/// Map a local `file:` URL to a filesystem path.
fn local_path(url: &Url) -> Result<std::path::PathBuf, FetchError> {
    url.to_file_path().map_err(|()| FetchError::File {
        path: url.as_str().to_string(),
        source: std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "not a local file path",
        ),
    })
}
