//! Foreground color selection by contrast against a background.

use crate::Rgb;

/// White foreground.
pub const WHITE: Rgb = Rgb::new(255, 255, 255);

/// Dark gray foreground.
pub const DARK_GRAY: Rgb = Rgb::new(64, 64, 64);

/// Threshold on the white-vs-background contrast ratio above which white is
/// used as the foreground.
const WHITE_CONTRAST_THRESHOLD: f64 = 1.5;

/// Select a foreground color with enough contrast against `background`.
///
/// A simplified two-tier rule, not full WCAG AA/AAA: white when the
/// white-vs-background contrast ratio exceeds 1.5, dark gray otherwise.
/// Deterministic - the result is always exactly one of [`WHITE`] or
/// [`DARK_GRAY`].
#[must_use]
pub fn foreground_for(background: Rgb) -> Rgb {
    if white_contrast_ratio(background) > WHITE_CONTRAST_THRESHOLD {
        WHITE
    } else {
        DARK_GRAY
    }
}

/// Contrast ratio between white and the given background color.
/// Ratios range from 1 upward.
fn white_contrast_ratio(background: Rgb) -> f64 {
    (relative_luminance(WHITE) + 0.05) / (relative_luminance(background) + 0.05)
}

/// sRGB-weighted relative luminance over raw 0-255 channels.
///
/// Deliberately unnormalized (channels are not scaled to 0-1), for parity
/// with the behavior this system derives from rather than the WCAG
/// formula's convention.
fn relative_luminance(color: Rgb) -> f64 {
    0.2126 * f64::from(color.r) + 0.7152 * f64::from(color.g) + 0.0722 * f64::from(color.b)
}
