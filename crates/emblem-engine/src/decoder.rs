//! Container-aware icon decoding: sniff, enumerate, and decode every image
//! embedded in a fetched resource.
//!
//! A single favicon resource may embed multiple images - the canonical case
//! is an ICO container holding 16/24/32/64 px variants, each directory
//! entry independently PNG- or BMP-encoded. Codec selection is a two-step
//! process over a priority-ordered registry:
//!
//! 1. **Sniff** - each codec inspects the byte stream's signature.
//! 2. **Extension fallback** - if no codec recognizes the signature, the
//!    URL's file extension picks the codec.
//!
//! If neither yields a codec the resource is unsupported and the candidate
//! is dropped by the pipeline.

use emblem_common::icon::DecodedImage;
use image::{DynamicImage, GenericImageView, ImageFormat};
use thiserror::Error;

/// PNG signature; ICO directory entries may be PNG-encoded.
const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

/// ICONDIR header prefix: reserved word 0, type word 1.
const ICO_MAGIC: &[u8] = &[0, 0, 1, 0];

/// Size in bytes of the ICONDIR header.
const ICO_HEADER_LEN: usize = 6;

/// Size in bytes of one ICONDIRENTRY.
const ICO_ENTRY_LEN: usize = 16;

/// Size in bytes of a BMP file header (`BM` + sizes + data offset).
const BMP_FILE_HEADER_LEN: u32 = 14;

/// Decoding failure for a fetched resource.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// No codec recognizes the byte signature or the URL extension.
    #[error("image format {} not supported", .extension.as_deref().unwrap_or("(unknown)"))]
    Unsupported {
        /// The URL's lowercase file extension, when one was available.
        extension: Option<String>,
    },

    /// The container structure is invalid or truncated.
    #[error("malformed container: {0}")]
    Malformed(String),

    /// The underlying raster codec failed mid-decode.
    #[error("codec error: {0}")]
    Codec(#[from] image::ImageError),

    /// A decoded entry reported zero width or height.
    #[error("entry {index} has zero dimensions")]
    EmptyEntry {
        /// Container index of the offending entry.
        index: usize,
    },
}

impl DecodeError {
    /// Whether this failure means "no codec claims the bytes" as opposed to
    /// a codec failing mid-decode.
    #[must_use]
    pub const fn is_unsupported(&self) -> bool {
        matches!(self, Self::Unsupported { .. })
    }
}

/// A codec capable of decoding one family of icon resources, possibly
/// containing multiple embedded images.
pub trait ContainerCodec {
    /// Human-readable name (for diagnostics).
    fn name(&self) -> &'static str;

    /// Whether this codec recognizes the byte signature.
    fn sniff(&self, bytes: &[u8]) -> bool;

    /// Whether this codec handles resources with the given lowercase file
    /// extension (the fallback when no signature matched).
    fn handles_extension(&self, extension: &str) -> bool;

    /// Decode every image embedded in `bytes`, in container order.
    ///
    /// `extension` is the resource URL's lowercase file extension, for
    /// codecs selected by the fallback path.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the container structure or any entry
    /// fails to decode; decoding is eager and the first failure wins.
    fn decode_all(
        &self,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> Result<Vec<DecodedImage>, DecodeError>;
}

/// Decodes ICO containers, enumerating every directory entry.
pub struct IcoCodec;

impl ContainerCodec for IcoCodec {
    fn name(&self) -> &'static str {
        "ICO container"
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        bytes.len() >= ICO_HEADER_LEN && bytes.starts_with(ICO_MAGIC)
    }

    fn handles_extension(&self, extension: &str) -> bool {
        extension == "ico"
    }

    fn decode_all(
        &self,
        bytes: &[u8],
        _extension: Option<&str>,
    ) -> Result<Vec<DecodedImage>, DecodeError> {
        if bytes.len() < ICO_HEADER_LEN {
            return Err(DecodeError::Malformed("ICONDIR header truncated".to_string()));
        }
        let count = usize::from(u16::from_le_bytes([bytes[4], bytes[5]]));

        let mut images = Vec::with_capacity(count);
        for index in 0..count {
            let entry = directory_entry(bytes, index)?;
            let payload = bytes
                .get(entry.offset..entry.offset.saturating_add(entry.len))
                .ok_or_else(|| {
                    DecodeError::Malformed(format!("entry {index} payload out of bounds"))
                })?;
            let (decoded, format) = decode_entry(payload)?;
            let (width, height) = decoded.dimensions();
            if width == 0 || height == 0 {
                return Err(DecodeError::EmptyEntry { index });
            }
            images.push(DecodedImage::new(
                index,
                format.to_string(),
                width,
                height,
                decoded.to_rgba8().into_raw(),
            ));
        }
        Ok(images)
    }
}

/// One parsed ICONDIRENTRY: payload location only. Dimensions come from
/// the decoded entry itself - the directory's size bytes cap at 256 and
/// disagree with the payload often enough not to be trusted.
struct DirectoryEntry {
    offset: usize,
    len: usize,
}

/// Read the ICONDIRENTRY at `index`.
fn directory_entry(bytes: &[u8], index: usize) -> Result<DirectoryEntry, DecodeError> {
    let start = ICO_HEADER_LEN + index * ICO_ENTRY_LEN;
    let entry = bytes.get(start..start + ICO_ENTRY_LEN).ok_or_else(|| {
        DecodeError::Malformed(format!("directory entry {index} truncated"))
    })?;
    let len = u32::from_le_bytes([entry[8], entry[9], entry[10], entry[11]]) as usize;
    let offset = u32::from_le_bytes([entry[12], entry[13], entry[14], entry[15]]) as usize;
    Ok(DirectoryEntry { offset, len })
}

/// Decode one directory entry payload: the PNG magic selects the PNG codec,
/// anything else is an ICO-style BMP.
fn decode_entry(payload: &[u8]) -> Result<(DynamicImage, &'static str), DecodeError> {
    if payload.starts_with(PNG_MAGIC) {
        let decoded = image::load_from_memory_with_format(payload, ImageFormat::Png)?;
        Ok((decoded, "png"))
    } else {
        let wrapped = wrap_ico_bmp(payload)?;
        let decoded = image::load_from_memory_with_format(&wrapped, ImageFormat::Bmp)?;
        Ok((decoded, "bmp"))
    }
}

/// Wrap an ICO directory entry's headerless DIB in a standard BMP file so
/// the raster codec can decode it.
///
/// ICO stores each BMP entry as a bare BITMAPINFOHEADER with *doubled*
/// height (XOR pixel data followed by the 1-bit AND transparency mask) and
/// no file header. The wrapper prepends a file header whose data offset
/// skips the info header and color table, and halves the height back; the
/// AND mask is left trailing where the codec ignores it.
fn wrap_ico_bmp(dib: &[u8]) -> Result<Vec<u8>, DecodeError> {
    if dib.len() < 40 {
        return Err(DecodeError::Malformed("BMP entry header truncated".to_string()));
    }
    let header_size = u32::from_le_bytes([dib[0], dib[1], dib[2], dib[3]]);
    if header_size < 40 || header_size as usize > dib.len() {
        return Err(DecodeError::Malformed(format!(
            "BMP entry header size {header_size} out of range"
        )));
    }
    let doubled_height = i32::from_le_bytes([dib[8], dib[9], dib[10], dib[11]]);
    let bit_count = u16::from_le_bytes([dib[14], dib[15]]);
    let colors_used = u32::from_le_bytes([dib[32], dib[33], dib[34], dib[35]]);

    let palette_entries = if colors_used != 0 {
        colors_used
    } else if bit_count <= 8 {
        1_u32 << bit_count
    } else {
        0
    };
    if palette_entries > 256 {
        return Err(DecodeError::Malformed(format!(
            "BMP entry claims {palette_entries} palette entries"
        )));
    }
    let data_offset = BMP_FILE_HEADER_LEN + header_size + palette_entries * 4;

    let file_len = BMP_FILE_HEADER_LEN as usize + dib.len();
    let mut bmp = Vec::with_capacity(file_len);
    bmp.extend_from_slice(b"BM");
    bmp.extend_from_slice(&(file_len as u32).to_le_bytes());
    bmp.extend_from_slice(&[0; 4]);
    bmp.extend_from_slice(&data_offset.to_le_bytes());
    bmp.extend_from_slice(dib);

    // Halve the doubled height in place (offset 8 within the info header).
    let height = doubled_height / 2;
    let height_field = BMP_FILE_HEADER_LEN as usize + 8;
    bmp[height_field..height_field + 4].copy_from_slice(&height.to_le_bytes());
    Ok(bmp)
}

/// Decodes single-image raster formats via the `image` crate.
pub struct RasterCodec;

impl ContainerCodec for RasterCodec {
    fn name(&self) -> &'static str {
        "raster"
    }

    fn sniff(&self, bytes: &[u8]) -> bool {
        image::guess_format(bytes).is_ok()
    }

    fn handles_extension(&self, extension: &str) -> bool {
        ImageFormat::from_extension(extension).is_some()
    }

    fn decode_all(
        &self,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> Result<Vec<DecodedImage>, DecodeError> {
        let format = match image::guess_format(bytes) {
            Ok(format) => format,
            Err(_) => extension
                .and_then(ImageFormat::from_extension)
                .ok_or_else(|| DecodeError::Unsupported {
                    extension: extension.map(str::to_string),
                })?,
        };
        let decoded = image::load_from_memory_with_format(bytes, format)?;
        let (width, height) = decoded.dimensions();
        if width == 0 || height == 0 {
            return Err(DecodeError::EmptyEntry { index: 0 });
        }
        Ok(vec![DecodedImage::new(
            0,
            format_name(format).to_string(),
            width,
            height,
            decoded.to_rgba8().into_raw(),
        )])
    }
}

/// Lowercase format tag for a raster format.
pub(crate) fn format_name(format: ImageFormat) -> &'static str {
    match format {
        ImageFormat::Png => "png",
        ImageFormat::Bmp => "bmp",
        ImageFormat::Gif => "gif",
        ImageFormat::Jpeg => "jpeg",
        ImageFormat::Ico => "ico",
        ImageFormat::WebP => "webp",
        ImageFormat::Tiff => "tiff",
        ImageFormat::Tga => "tga",
        other => other.extensions_str().first().copied().unwrap_or("unknown"),
    }
}

/// Priority-ordered codec registry: the sniff pass runs over every codec
/// first, then the extension-fallback pass.
pub struct ContainerDecoder {
    codecs: Vec<Box<dyn ContainerCodec>>,
}

impl ContainerDecoder {
    /// Create a decoder with the default codecs: ICO containers first, then
    /// the generic raster codec.
    #[must_use]
    pub fn new() -> Self {
        Self {
            codecs: vec![Box::new(IcoCodec), Box::new(RasterCodec)],
        }
    }

    /// Decode every image embedded in `bytes`, in container order.
    ///
    /// `extension` is the resource URL's file extension, consulted only
    /// when no codec recognizes the byte signature.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::Unsupported`] when no codec claims the bytes,
    /// otherwise whatever the selected codec reports.
    pub fn decode_all(
        &self,
        bytes: &[u8],
        extension: Option<&str>,
    ) -> Result<Vec<DecodedImage>, DecodeError> {
        let lowered = extension.map(str::to_ascii_lowercase);
        let ext = lowered.as_deref();

        for codec in &self.codecs {
            if codec.sniff(bytes) {
                return codec.decode_all(bytes, ext);
            }
        }
        for codec in &self.codecs {
            if ext.is_some_and(|e| codec.handles_extension(e)) {
                return codec.decode_all(bytes, ext);
            }
        }
        Err(DecodeError::Unsupported { extension: lowered })
    }
}

impl Default for ContainerDecoder {
    fn default() -> Self {
        Self::new()
    }
}
