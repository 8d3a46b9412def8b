//! Shared fixtures for engine integration tests: in-memory ICO containers
//! and encoded raster images.

// Not every test binary uses every fixture.
#![allow(dead_code)]

use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

/// A solid-color RGBA image.
pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(width, height, Rgba(rgba))
}

/// Encode an image in the given format.
pub fn encode(image: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    image.write_to(&mut out, format).unwrap();
    out.into_inner()
}

/// Assemble an ICO container from pre-encoded entry payloads.
///
/// `dims` supplies the width/height bytes for each ICONDIRENTRY (0 encodes
/// 256); decoders are expected to trust the payload, not these bytes.
pub fn build_ico(payloads: &[Vec<u8>], dims: &[(u8, u8)]) -> Vec<u8> {
    assert_eq!(payloads.len(), dims.len());
    let count = u16::try_from(payloads.len()).unwrap();

    let mut ico = vec![0, 0, 1, 0];
    ico.extend_from_slice(&count.to_le_bytes());

    let mut offset = 6 + 16 * payloads.len();
    for (payload, (width, height)) in payloads.iter().zip(dims) {
        ico.push(*width);
        ico.push(*height);
        ico.push(0); // palette size
        ico.push(0); // reserved
        ico.extend_from_slice(&1u16.to_le_bytes()); // color planes
        ico.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
        ico.extend_from_slice(&u32::try_from(payload.len()).unwrap().to_le_bytes());
        ico.extend_from_slice(&u32::try_from(offset).unwrap().to_le_bytes());
        offset += payload.len();
    }
    for payload in payloads {
        ico.extend_from_slice(payload);
    }
    ico
}

/// A bare BITMAPINFOHEADER directory entry: doubled height, 32bpp
/// bottom-up pixel data, then the 1-bit AND mask padded to 32-bit rows.
pub fn bmp_dib_entry(width: u32, height: u32, bgra: [u8; 4]) -> Vec<u8> {
    let mut dib = Vec::new();
    dib.extend_from_slice(&40u32.to_le_bytes());
    dib.extend_from_slice(&i32::try_from(width).unwrap().to_le_bytes());
    dib.extend_from_slice(&i32::try_from(height * 2).unwrap().to_le_bytes());
    dib.extend_from_slice(&1u16.to_le_bytes()); // planes
    dib.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
    dib.extend_from_slice(&0u32.to_le_bytes()); // BI_RGB
    dib.extend_from_slice(&(width * height * 4).to_le_bytes());
    dib.extend_from_slice(&[0u8; 16]); // resolutions, palette counts

    for _ in 0..width * height {
        dib.extend_from_slice(&bgra);
    }
    let mask_row_len = width.div_ceil(32) * 4;
    dib.extend(std::iter::repeat_n(0u8, (mask_row_len * height) as usize));
    dib
}
