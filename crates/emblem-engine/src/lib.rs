//! High-level favicon pipeline for the emblem toolkit.
//!
//! # Scope
//!
//! This crate provides:
//! - **Container Decoding** - sniff-then-extension codec selection over
//!   multi-image containers ([`decoder`])
//! - **Export** - writing raw icons and embedded sub-images to disk
//!   ([`export`])
//! - **Letter Icons** - fallback circle-plus-glyph synthesis ([`letter`])
//! - **Orchestration** - [`IconPipeline`]: discover, fetch, decode,
//!   summarize, and synthesize, one candidate at a time
//!
//! Everything runs single-threaded and synchronous: discovery, each fetch,
//! each decode, and quantization execute sequentially. Candidates share no
//! mutable state, and one candidate's failure never affects another's.

pub mod decoder;
pub mod export;
pub mod letter;

pub use decoder::{ContainerCodec, ContainerDecoder, DecodeError, IcoCodec, RasterCodec};
pub use export::{ExportError, save_embedded_in_dir, save_raw_in_dir, write_image};
pub use letter::{LetterIcon, LetterIconRenderer};

use emblem_color::{EmptyImage, Rgb, find_main_color};
use emblem_common::error::{FetchError, MalformedLocation};
use emblem_common::icon::{DecodedImage, Icon};
use emblem_common::warning::warn_once;
use emblem_common::{net, resolver};
use emblem_links::{IconLink, LinkDiscoverer};
use image::RgbaImage;
use thiserror::Error;
use url::Url;

/// Failure of a whole pipeline run. Per-candidate failures are dropped and
/// warned instead of raised.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The site location or a scanned href could not form an absolute URL.
    #[error(transparent)]
    Location(#[from] MalformedLocation),

    /// The site's index document could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
}

/// Failure fetching or decoding a single candidate. Collected per
/// candidate and filtered by the pipeline rather than raised.
#[derive(Debug, Error)]
pub enum CandidateError {
    /// Transport failure fetching the candidate.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// The candidate's bytes failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// Failure synthesizing a letter icon.
#[derive(Debug, Error)]
pub enum LetterIconError {
    /// Retrieving the site's icons failed outright.
    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    /// The chosen favicon stopped being fetchable or decodable after
    /// discovery.
    #[error("favicon at '{url}' unusable: {reason}")]
    UnusableFavicon {
        /// The favicon that was chosen.
        url: Url,
        /// Why it could not be used.
        reason: String,
    },

    /// The chosen favicon decoded to zero analyzable pixels. Callers
    /// should fall back to their fallback color.
    #[error(transparent)]
    EmptyImage(#[from] EmptyImage),
}

/// Orchestrates discovery, fetch, decode, and summarize for one site.
///
/// Each candidate is processed independently; a candidate that fails to
/// fetch or decode is dropped with a warning and the pipeline continues.
pub struct IconPipeline {
    discoverer: LinkDiscoverer,
    decoder: ContainerDecoder,
}

impl IconPipeline {
    /// Create a pipeline with the default discovery policy and codecs.
    #[must_use]
    pub fn new() -> Self {
        Self {
            discoverer: LinkDiscoverer::new(),
            decoder: ContainerDecoder::new(),
        }
    }

    /// Create a pipeline with an explicit link discoverer.
    #[must_use]
    pub fn with_discoverer(discoverer: LinkDiscoverer) -> Self {
        Self {
            discoverer,
            decoder: ContainerDecoder::new(),
        }
    }

    /// Discover candidate icon links for `location` without fetching them.
    ///
    /// Remote sites are read from their site root; local `file:` documents
    /// are read directly.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the document cannot be located or
    /// fetched, or when discovery fails per its malformed-href policy.
    pub fn discover(&self, location: &str) -> Result<Vec<IconLink>, PipelineError> {
        let document_url = resolver::parse_location(location)?;
        let (html, document_location) = if net::is_local(&document_url) {
            let html = net::fetch_document(&document_url)?;
            (html, document_url)
        } else {
            let root = resolver::site_root(&document_url)?;
            let html = net::fetch_document(&root)?;
            (html, root)
        };
        Ok(self
            .discoverer
            .discover(&html, document_location.as_str())?)
    }

    /// Retrieve and summarize every advertised favicon for `location`.
    ///
    /// Fetches and decodes each discovered candidate in order. Candidates
    /// that fail are dropped with a warning; duplicate URLs are fetched
    /// again, not merged.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the index document itself cannot be
    /// located or fetched; per-candidate failures never fail the run.
    pub fn retrieve_all(&self, location: &str) -> Result<Vec<Icon>, PipelineError> {
        let links = self.discover(location)?;
        Ok(links
            .into_iter()
            .filter_map(|link| self.summarize(link.into_url()))
            .collect())
    }

    /// Fetch a candidate URL and decode every embedded image with full
    /// pixel data.
    ///
    /// # Errors
    ///
    /// Returns [`CandidateError`] on transport or decode failure.
    pub fn decode_all_images(&self, url: &Url) -> Result<Vec<DecodedImage>, CandidateError> {
        let bytes = net::fetch_bytes(url)?;
        let extension = resolver::file_extension(url);
        Ok(self.decoder.decode_all(&bytes, extension.as_deref())?)
    }

    /// Synthesize a letter icon for `location`.
    ///
    /// Uses the dominant color of the first discovered favicon's first
    /// image as the circle background, or `fallback` when the site
    /// advertises no usable favicon at all. The glyph is the first letter
    /// of the host.
    ///
    /// # Errors
    ///
    /// Returns [`LetterIconError::EmptyImage`] when the chosen favicon
    /// decodes to zero pixels (callers should render with `fallback`
    /// instead); location and transport failures per [`PipelineError`].
    pub fn letter_icon_for(
        &self,
        renderer: &LetterIconRenderer,
        location: &str,
        fallback: Rgb,
        size: u32,
    ) -> Result<RgbaImage, LetterIconError> {
        let document_url = resolver::parse_location(location).map_err(PipelineError::from)?;
        let letter = resolver::first_letter(&document_url);

        let icons = self.retrieve_all(location)?;
        let Some(first) = icons.first() else {
            return Ok(renderer.render(&LetterIcon::new(size, letter, fallback)));
        };

        let images = self.decode_all_images(&first.url).map_err(|err| {
            LetterIconError::UnusableFavicon {
                url: first.url.clone(),
                reason: err.to_string(),
            }
        })?;
        let Some(image) = images.first() else {
            return Err(LetterIconError::UnusableFavicon {
                url: first.url.clone(),
                reason: "contains no images".to_string(),
            });
        };

        let background = find_main_color(image)?;
        Ok(renderer.render(&LetterIcon::new(size, letter, background)))
    }

    /// Fetch and summarize a single candidate; `None` drops it.
    fn summarize(&self, url: Url) -> Option<Icon> {
        match self.decode_all_images(&url) {
            Ok(images) => Some(Icon {
                images: images.iter().map(DecodedImage::info).collect(),
                url,
            }),
            Err(err) => {
                warn_once("pipeline", &format!("no icons found at '{url}': {err}"));
                None
            }
        }
    }
}

impl Default for IconPipeline {
    fn default() -> Self {
        Self::new()
    }
}
