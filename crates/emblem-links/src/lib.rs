//! Favicon link discovery.
//!
//! Given an HTML document and its location, produces the ordered set of
//! candidate icon URLs: a fixed list of conventional well-known paths
//! followed by `<link>`-tag-derived paths, each resolved against the
//! document's effective base (honoring a `<base href>` override).
//!
//! The output order is not semantically significant but is stable for
//! reproducibility, and nothing is deduplicated: the same effective URL may
//! appear once from the conventional list and again from a tag. Downstream
//! consumers must tolerate duplicate fetch attempts.

use emblem_common::error::MalformedLocation;
use emblem_common::resolver;
use emblem_common::warning::warn_once;
use scraper::{Html, Selector};
use strum::IntoEnumIterator;
use strum_macros::EnumIter;
use url::Url;

/// Conventional icon paths probed on every site, resolved against the
/// effective base even when no matching tag exists on the page. Probing
/// them directly is always a valid strategy, at the cost of index requests.
pub const COMMON_ICON_PATHS: &[&str] = &[
    // legacy convention: serving /favicon.ico with no markup at all
    "favicon.ico",
    // apple touch devices, no-markup conventions
    "apple-touch-icon.png",
    "apple-touch-icon-precomposed.png",
];

/// The `rel` attribute values that mark a `<link>` element as an icon
/// reference.
///
/// Discovery scans the document once per kind, in declaration order here,
/// so tag-derived candidates come out grouped by rel kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum IconRel {
    /// `rel="icon"`
    Icon,
    /// `rel="shortcut icon"`
    ShortcutIcon,
    /// `rel="apple-touch-icon"`
    AppleTouchIcon,
    /// `rel="apple-touch-icon-precomposed"`
    AppleTouchIconPrecomposed,
}

impl IconRel {
    /// The normalized `rel` attribute value for this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Icon => "icon",
            Self::ShortcutIcon => "shortcut icon",
            Self::AppleTouchIcon => "apple-touch-icon",
            Self::AppleTouchIconPrecomposed => "apple-touch-icon-precomposed",
        }
    }
}

/// An absolute URL candidate for an icon resource. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconLink(Url);

impl IconLink {
    /// The resolved absolute URL.
    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.0
    }

    /// Consume the link, returning the URL.
    #[must_use]
    pub fn into_url(self) -> Url {
        self.0
    }
}

/// How discovery reacts to a `<link>` href that cannot be resolved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedHrefPolicy {
    /// Skip the offending element and keep scanning (default).
    ///
    /// One bad tag should not hide every other icon on the page.
    #[default]
    SkipEntry,
    /// Abort discovery for the whole document.
    AbortDocument,
}

/// Discovers candidate icon URLs in an HTML document.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinkDiscoverer {
    policy: MalformedHrefPolicy,
}

impl LinkDiscoverer {
    /// Create a discoverer with the default skip-and-continue policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a discoverer with an explicit malformed-href policy.
    #[must_use]
    pub const fn with_policy(policy: MalformedHrefPolicy) -> Self {
        Self { policy }
    }

    /// Discover candidate icon URLs in `html`, located at
    /// `document_location`.
    ///
    /// The result always starts with the conventional well-known paths,
    /// then the tag-derived candidates grouped by rel kind. Nothing is
    /// deduplicated.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedLocation`] if the document location or a
    /// `<base href>` cannot form an absolute URL, or - under
    /// [`MalformedHrefPolicy::AbortDocument`] - if any scanned href fails
    /// to resolve.
    pub fn discover(
        &self,
        html: &str,
        document_location: &str,
    ) -> Result<Vec<IconLink>, MalformedLocation> {
        let document = Html::parse_document(html);
        let base =
            resolver::effective_base(document_location, base_tag_href(&document).as_deref())?;

        let mut links = Vec::new();
        for path in COMMON_ICON_PATHS {
            links.push(IconLink(resolver::resolve(&base, path)?));
        }
        self.scan_link_tags(&document, &base, &mut links)?;
        Ok(links)
    }

    /// Resolve the hrefs of icon `<link>` elements into `out`, grouped by
    /// rel kind. Elements lacking an href contribute nothing.
    fn scan_link_tags(
        &self,
        document: &Html,
        base: &Url,
        out: &mut Vec<IconLink>,
    ) -> Result<(), MalformedLocation> {
        let Ok(selector) = Selector::parse("link[rel][href]") else {
            return Ok(());
        };
        let tagged: Vec<(String, &str)> = document
            .select(&selector)
            .filter_map(|element| {
                let rel = normalize_rel(element.value().attr("rel")?);
                let href = element.value().attr("href")?;
                Some((rel, href))
            })
            .collect();

        for kind in IconRel::iter() {
            for (rel, href) in &tagged {
                if rel != kind.as_str() {
                    continue;
                }
                match resolver::resolve(base, href) {
                    Ok(url) => out.push(IconLink(url)),
                    Err(err) => match self.policy {
                        MalformedHrefPolicy::AbortDocument => return Err(err),
                        MalformedHrefPolicy::SkipEntry => warn_once(
                            "links",
                            &format!("skipping malformed icon href '{href}': {err}"),
                        ),
                    },
                }
            }
        }
        Ok(())
    }
}

/// Extract the href of the document's `<base>` element, if any.
fn base_tag_href(document: &Html) -> Option<String> {
    let selector = Selector::parse("head base[href]").ok()?;
    document
        .select(&selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(str::to_string)
}

/// Normalize a `rel` attribute for comparison: collapse internal
/// whitespace and lowercase.
fn normalize_rel(rel: &str) -> String {
    rel.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_rel;

    #[test]
    fn test_normalize_rel() {
        assert_eq!(normalize_rel("ICON"), "icon");
        assert_eq!(normalize_rel("  Shortcut   Icon "), "shortcut icon");
        assert_eq!(normalize_rel("apple-touch-icon"), "apple-touch-icon");
    }
}
