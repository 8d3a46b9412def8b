//! Writing fetched icons and their decoded images back to disk.
//!
//! Two export shapes: raw resource bytes (`{i}_{filename}`) and every
//! embedded sub-image (`{i}_{j}_{filename}`, extension rewritten to the
//! format actually written). Index prefixes keep distinct candidates with
//! identical file names (two `favicon.ico`s) from colliding.

use crate::decoder::{ContainerDecoder, DecodeError};
use emblem_common::error::FetchError;
use emblem_common::icon::{DecodedImage, Icon};
use emblem_common::warning::warn_once;
use emblem_common::{net, resolver};
use image::{ImageFormat, RgbaImage};
use std::path::Path;
use thiserror::Error;

/// Fallback file stem when an icon URL has no final path segment.
const DEFAULT_FILE_NAME: &str = "icon";

/// Failure saving icons to a directory.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The target path is not a directory.
    #[error("'{0}' is not a directory")]
    NotADirectory(String),

    /// An icon's bytes could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// An icon failed to decode.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Filesystem write failure.
    #[error("failed to write '{path}': {source}")]
    Io {
        /// The path being written.
        path: String,
        /// The underlying I/O error.
        source: std::io::Error,
    },
}

/// Save each icon's original bytes to `{i}_{filename}` in `dir`.
///
/// The index prefix records processing order and keeps same-named icons
/// apart.
///
/// # Errors
///
/// Returns [`ExportError`] when `dir` is not a directory or a fetch or
/// write fails.
pub fn save_raw_in_dir(icons: &[Icon], dir: &Path) -> Result<(), ExportError> {
    ensure_directory(dir)?;
    for (i, icon) in icons.iter().enumerate() {
        let bytes = net::fetch_bytes(&icon.url)?;
        let name = resolver::file_name(&icon.url)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        let path = dir.join(format!("{i}_{name}"));
        std::fs::write(&path, bytes).map_err(|source| ExportError::Io {
            path: path.display().to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Re-decode each icon and write every embedded sub-image to
/// `{i}_{j}_{filename}` in `dir`.
///
/// The first index is the icon's processing order, the second the image's
/// position within its container, so a four-resolution `favicon.ico` at
/// position 0 produces `0_0_favicon.png` through `0_3_favicon.png`. The
/// extension is rewritten to the format actually written; individual write
/// failures are warned, not raised.
///
/// # Errors
///
/// Returns [`ExportError`] when `dir` is not a directory or a fetch or
/// decode fails.
pub fn save_embedded_in_dir(
    icons: &[Icon],
    dir: &Path,
    decoder: &ContainerDecoder,
) -> Result<(), ExportError> {
    ensure_directory(dir)?;
    for (i, icon) in icons.iter().enumerate() {
        let bytes = net::fetch_bytes(&icon.url)?;
        let extension = resolver::file_extension(&icon.url);
        let images = decoder.decode_all(&bytes, extension.as_deref())?;
        let name = resolver::file_name(&icon.url)
            .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string());
        for image in &images {
            let path = dir.join(format!("{i}_{j}_{name}", j = image.index()));
            let _ = write_image(image, &path);
        }
    }
    Ok(())
}

/// Write one decoded image to `path`, rewriting the extension to the
/// format actually written. Returns `true` when a file was written.
///
/// Images tagged `"ico"` (the container-level tag a codec reports when it
/// decodes an ICO as a single image) are only guaranteed to be PNG- or
/// BMP-encodable: try PNG first, fall back to BMP, and report failure
/// without raising.
pub fn write_image(image: &DecodedImage, path: &Path) -> bool {
    let Some(buffer) =
        RgbaImage::from_raw(image.width(), image.height(), image.rgba().to_vec())
    else {
        warn_once(
            "export",
            &format!("pixel buffer mismatch for '{}'", path.display()),
        );
        return false;
    };

    if image.format() == "ico" {
        return save(&buffer, &path.with_extension("png"), ImageFormat::Png)
            || save(&buffer, &path.with_extension("bmp"), ImageFormat::Bmp);
    }

    let format = ImageFormat::from_extension(image.format()).unwrap_or(ImageFormat::Png);
    let target = path.with_extension(crate::decoder::format_name(format));
    save(&buffer, &target, format)
}

/// Encode `buffer` to `path` in `format`, warning on failure.
fn save(buffer: &RgbaImage, path: &Path, format: ImageFormat) -> bool {
    match buffer.save_with_format(path, format) {
        Ok(()) => true,
        Err(err) => {
            warn_once(
                "export",
                &format!("failed to write '{}': {err}", path.display()),
            );
            false
        }
    }
}

/// Fail unless `dir` exists and is a directory.
fn ensure_directory(dir: &Path) -> Result<(), ExportError> {
    if dir.is_dir() {
        Ok(())
    } else {
        Err(ExportError::NotADirectory(dir.display().to_string()))
    }
}
