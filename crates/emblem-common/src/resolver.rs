//! URL resolution for favicon discovery.
//!
//! Implements the effective-base rule for documents that declare a
//! `<base href>` element and RFC 3986 reference resolution for every
//! candidate path, conventional or tag-derived.

use crate::error::MalformedLocation;
use url::Url;

/// Parse an absolute URL, mapping failure to [`MalformedLocation`].
///
/// # Errors
///
/// Returns [`MalformedLocation`] when `input` is not a valid absolute URL.
pub fn parse_location(input: &str) -> Result<Url, MalformedLocation> {
    Url::parse(input).map_err(|source| MalformedLocation {
        input: input.to_string(),
        source,
    })
}

/// Compute the effective base URL for a document.
///
/// If the document declares `<base href="...">`, the effective base is that
/// href resolved against the document's own location; otherwise it is the
/// document's location itself.
///
/// # Errors
///
/// Returns [`MalformedLocation`] when the document location or the base
/// href cannot form a valid absolute URL.
pub fn effective_base(
    document_location: &str,
    base_tag_href: Option<&str>,
) -> Result<Url, MalformedLocation> {
    let location = parse_location(document_location)?;
    match base_tag_href {
        Some(href) => resolve(&location, href),
        None => Ok(location),
    }
}

/// Resolve a possibly-relative `href` against `base`.
///
/// Absolute hrefs pass through unchanged; scheme-relative and path-relative
/// hrefs resolve per RFC 3986.
///
/// # Errors
///
/// Returns [`MalformedLocation`] when the resolved result cannot form a
/// valid absolute URL.
pub fn resolve(base: &Url, href: &str) -> Result<Url, MalformedLocation> {
    base.join(href).map_err(|source| MalformedLocation {
        input: href.to_string(),
        source,
    })
}

/// The site root for a URL: scheme and host with an empty path.
///
/// `http://www.youtube.com/hello` becomes `http://www.youtube.com/`.
///
/// # Errors
///
/// Returns [`MalformedLocation`] for URLs that cannot carry a path (for
/// example `data:` URLs).
pub fn site_root(url: &Url) -> Result<Url, MalformedLocation> {
    resolve(url, "/")
}

/// The first letter of a URL's host with any leading `www.` stripped.
///
/// Used as the letter-icon glyph. Returns `'?'` when the URL has no host or
/// the host is empty after stripping.
#[must_use]
pub fn first_letter(url: &Url) -> char {
    url.host_str()
        .map(|host| host.trim_start_matches("www."))
        .and_then(|host| host.chars().next())
        .unwrap_or('?')
}

/// The file extension of a URL's path, lowercased.
///
/// Query strings and fragments are not part of the path and never leak into
/// the extension. Returns `None` when the final segment has no dot or ends
/// with one.
#[must_use]
pub fn file_extension(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.next_back()?;
    let (_, extension) = segment.rsplit_once('.')?;
    if extension.is_empty() {
        return None;
    }
    Some(extension.to_ascii_lowercase())
}

/// The final path segment of a URL, used when naming exported files.
#[must_use]
pub fn file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .next_back()
        .filter(|segment| !segment.is_empty())
        .map(str::to_string)
}
