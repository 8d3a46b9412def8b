//! Letter-icon synthesis: an anti-aliased colored circle with a single
//! centered glyph.
//!
//! The circle is filled by tiny-skia on a transparent canvas; the glyph is
//! rasterized by fontdue and alpha-blended on top. Rendering is
//! deterministic: identical inputs (and font) produce byte-identical
//! output.

use emblem_color::{Rgb, contrast};
use emblem_common::warning::warn_once;
use fontdue::{Font, FontSettings};
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

/// Glyph size as a fraction of the icon size.
const FONT_SIZE_FACTOR: f32 = 0.688_034;

/// Vertical glyph offset as a fraction of the icon size.
const Y_OFFSET_FACTOR: f32 = 102.0 / 1024.0;

/// Common system font paths to search for the glyph font.
const FONT_SEARCH_PATHS: &[&str] = &[
    // macOS
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/SFNS.ttf",
    "/Library/Fonts/Arial.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    // Linux
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    // Windows
    "C:\\Windows\\Fonts\\arial.ttf",
    "C:\\Windows\\Fonts\\segoeui.ttf",
];

/// A fallback icon: colored circle plus one uppercase glyph.
///
/// The foreground (glyph) color is never stored; it is recomputed from the
/// background via the contrast rule at render time, which is cheap and
/// avoids a stale-cache invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LetterIcon {
    size: u32,
    letter: char,
    background: Rgb,
}

impl LetterIcon {
    /// Create a letter icon; the glyph is stored uppercased.
    #[must_use]
    pub fn new(size: u32, letter: char, background: Rgb) -> Self {
        Self {
            size,
            letter: letter.to_uppercase().next().unwrap_or(letter),
            background,
        }
    }

    /// Width and height of the icon in pixels.
    #[must_use]
    pub const fn size(&self) -> u32 {
        self.size
    }

    /// The glyph written in the middle of the icon (always uppercase).
    #[must_use]
    pub const fn letter(&self) -> char {
        self.letter
    }

    /// The background color of the circle.
    #[must_use]
    pub const fn background(&self) -> Rgb {
        self.background
    }
}

/// Renders letter icons with a system-discovered or explicit glyph font.
pub struct LetterIconRenderer {
    font: Option<Font>,
}

impl LetterIconRenderer {
    /// Create a renderer, loading the first available system font.
    ///
    /// When no font can be found a warning is emitted once and rendered
    /// icons carry only the colored circle.
    #[must_use]
    pub fn new() -> Self {
        let font = load_font_from_paths(FONT_SEARCH_PATHS);
        if font.is_none() {
            warn_once(
                "letter",
                "no system font found; letter icons will omit the glyph",
            );
        }
        Self { font }
    }

    /// Create a renderer from explicit font bytes.
    ///
    /// # Errors
    ///
    /// Returns the font parser's error string when the bytes are not a
    /// usable font.
    pub fn from_font_bytes(bytes: &[u8]) -> Result<Self, &'static str> {
        Font::from_bytes(bytes, FontSettings::default()).map(|font| Self { font: Some(font) })
    }

    /// Rasterize `icon` to an RGBA image.
    #[must_use]
    pub fn render(&self, icon: &LetterIcon) -> RgbaImage {
        let mut canvas = render_circle(icon.size(), icon.background());
        if let Some(font) = &self.font {
            draw_glyph(&mut canvas, font, icon);
        }
        canvas
    }
}

impl Default for LetterIconRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Try to load a font from a list of filesystem paths.
fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    for path in paths {
        if let Ok(data) = std::fs::read(path) {
            if let Ok(font) = Font::from_bytes(data, FontSettings::default()) {
                return Some(font);
            }
        }
    }
    None
}

/// Fill an anti-aliased circle inscribed in a `size`-square transparent
/// canvas.
#[allow(clippy::cast_precision_loss)]
fn render_circle(size: u32, background: Rgb) -> RgbaImage {
    let Some(mut pixmap) = Pixmap::new(size, size) else {
        return RgbaImage::new(size, size);
    };

    let radius = size as f32 / 2.0;
    let mut paint = Paint::default();
    paint.set_color_rgba8(background.r, background.g, background.b, 255);
    paint.anti_alias = true;

    let mut builder = PathBuilder::new();
    builder.push_circle(radius, radius, radius);
    if let Some(path) = builder.finish() {
        pixmap.fill_path(&path, &paint, FillRule::Winding, Transform::identity(), None);
    }

    // The circle is opaque, so demultiplying loses nothing; the transparent
    // corners stay (0, 0, 0, 0).
    let mut canvas = RgbaImage::new(size, size);
    for (premultiplied, out) in pixmap.pixels().iter().zip(canvas.pixels_mut()) {
        let color = premultiplied.demultiply();
        *out = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
    }
    canvas
}

/// Rasterize the icon's glyph and blend it onto the canvas.
///
/// Horizontal centering uses the glyph advance width; the baseline sits at
/// a fixed fraction of the icon size plus the (ceiled) font size.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap
)]
fn draw_glyph(canvas: &mut RgbaImage, font: &Font, icon: &LetterIcon) {
    let size = icon.size();
    let font_size = FONT_SIZE_FACTOR * size as f32;
    let foreground = contrast::foreground_for(icon.background());

    let (metrics, bitmap) = font.rasterize(icon.letter(), font_size);

    let origin_x = ((size as f32 - metrics.advance_width) / 2.0).floor() as i32;
    let baseline = (Y_OFFSET_FACTOR * size as f32) as i32 + font_size.ceil() as i32;
    let glyph_x = origin_x + metrics.xmin;
    let glyph_y = baseline - metrics.ymin - metrics.height as i32;

    for gy in 0..metrics.height {
        for gx in 0..metrics.width {
            let coverage = bitmap[gy * metrics.width + gx];
            if coverage == 0 {
                continue;
            }
            let px = glyph_x + gx as i32;
            let py = glyph_y + gy as i32;
            if px < 0 || py < 0 || px as u32 >= size || py as u32 >= size {
                continue;
            }
            let base = *canvas.get_pixel(px as u32, py as u32);
            canvas.put_pixel(px as u32, py as u32, blend_over(foreground, base, coverage));
        }
    }
}

/// Source-over blend of `fg` at `coverage` onto `base`, carrying the
/// destination alpha so glyph edges stay correct near the transparent
/// corners.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn blend_over(fg: Rgb, base: Rgba<u8>, coverage: u8) -> Rgba<u8> {
    let a = f32::from(coverage) / 255.0;
    let inv = 1.0 - a;

    Rgba([
        f32::from(fg.r).mul_add(a, f32::from(base[0]) * inv) as u8,
        f32::from(fg.g).mul_add(a, f32::from(base[1]) * inv) as u8,
        f32::from(fg.b).mul_add(a, f32::from(base[2]) * inv) as u8,
        a.mul_add(255.0, f32::from(base[3]) * inv) as u8,
    ])
}
