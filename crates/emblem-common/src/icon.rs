//! Icon data types shared across pipeline stages.

use serde::Serialize;
use url::Url;

/// A decoded raster image extracted from an icon resource.
///
/// One resource may embed several images (the canonical case: an ICO
/// container holding multiple resolutions of the same icon); each decoded
/// entry owns its RGBA8 pixel buffer exclusively until handed to a
/// consumer.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Position inside the container, in container order.
    index: usize,
    /// Lowercase format name reported by the codec for this entry.
    format: String,
    /// Width in pixels.
    width: u32,
    /// Height in pixels.
    height: u32,
    /// Raw RGBA pixel data (`width * height * 4` bytes).
    rgba: Vec<u8>,
}

impl DecodedImage {
    /// Create a new `DecodedImage` from decoded RGBA8 pixel data.
    ///
    /// `rgba` must hold exactly `width * height * 4` bytes.
    #[must_use]
    pub fn new(index: usize, format: String, width: u32, height: u32, rgba: Vec<u8>) -> Self {
        debug_assert_eq!(rgba.len(), width as usize * height as usize * 4);
        Self {
            index,
            format,
            width,
            height,
            rgba,
        }
    }

    /// Position of this image inside its container, in container order.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Lowercase format name reported by the codec for this entry (within
    /// one ICO container, individual entries may be `"png"` or `"bmp"`).
    #[must_use]
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Width in pixels. Codecs never yield zero-dimension entries.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels. Codecs never yield zero-dimension entries.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Raw RGBA8 pixel data.
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// The RGBA bytes of the pixel at `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics when `(x, y)` is outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]]
    }

    /// Metadata-only view of this image.
    #[must_use]
    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            index: self.index,
            format: self.format.clone(),
            width: self.width,
            height: self.height,
        }
    }
}

/// Metadata for one image embedded in an icon resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// Position inside the container, in container order.
    pub index: usize,
    /// Lowercase format name for this entry (e.g. `"png"`, `"bmp"`).
    pub format: String,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A successfully summarized icon resource.
///
/// One `Icon` exists per candidate URL that fetched and decoded; candidates
/// that fail are dropped, not retried.
#[derive(Debug, Clone, Serialize)]
pub struct Icon {
    /// The resolved URL the icon was fetched from.
    pub url: Url,
    /// Embedded images in container order (not sorted by size).
    pub images: Vec<ImageInfo>,
}
