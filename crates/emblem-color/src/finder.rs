//! Iterative bucket-refinement search for an image's dominant color.
//!
//! Four passes at decreasing channel shifts (6, 4, 2, 0) walk the image
//! coarse to fine: the early passes cheaply identify a *region* of color
//! space likely to dominate, and the later passes refine within that region
//! at full precision. This avoids an exhaustive full-precision histogram
//! over all 16.7M possible colors.
//!
//! Bucket weight favors saturated (far from gray) colors, so a vivid accent
//! can out-rank a larger field of near-gray pixels.

use crate::Rgb;
use emblem_common::icon::DecodedImage;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// If the input image pixel count is over this threshold the refinement
/// passes sample every 2nd pixel in both axes.
const SAMPLE_THRESHOLD: u64 = 180 * 180;

/// The image contained no pixels to analyze.
///
/// Indicates a corrupt or unusable favicon; callers should fall back to the
/// letter icon's fallback color.
#[derive(Debug, Error)]
#[error("image has no pixels to analyze")]
pub struct EmptyImage;

/// Per-color statistics gathered once per image: occurrence count and
/// saturation weight.
#[derive(Debug, Clone, Copy)]
struct ColorStats {
    count: u32,
    weight: f64,
}

/// A color whose channels have been right-shifted by `shift` bits, used as
/// a bucket key at one refinement level.
///
/// Equality, hashing, and ordering are by `(shift, r, g, b)`; the derived
/// `Ord` backs the documented deterministic tie-break.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct ShiftedColor {
    shift: u8,
    r: u8,
    g: u8,
    b: u8,
}

impl ShiftedColor {
    /// Bucket `color` at `shift` bits of channel reduction.
    fn of(color: Rgb, shift: u8) -> Self {
        Self {
            shift,
            r: color.r >> shift,
            g: color.g >> shift,
            b: color.b >> shift,
        }
    }

    /// Whether `color` falls in this bucket's neighborhood at this bucket's
    /// own shift level.
    fn contains(self, color: Rgb) -> bool {
        self.r == color.r >> self.shift
            && self.g == color.g >> self.shift
            && self.b == color.b >> self.shift
    }

    /// The represented color at full channel range. Only meaningful for the
    /// shift-0 pass, where no reduction was applied.
    fn into_rgb(self) -> Rgb {
        debug_assert_eq!(self.shift, 0);
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Find the single dominant color of `image`.
///
/// Each refinement pass buckets sampled pixels at the current precision,
/// restricted to the color neighborhood the previous pass identified, and
/// carries the heaviest bucket forward; the shift-0 winner is the answer.
///
/// # Errors
///
/// Returns [`EmptyImage`] if the image has zero pixels.
pub fn find_main_color(image: &DecodedImage) -> Result<Rgb, EmptyImage> {
    let stats = build_color_stats(image);
    let coarse = refinement_pass(image, &stats, 6, None)?;
    let mid = refinement_pass(image, &stats, 4, Some(coarse))?;
    let fine = refinement_pass(image, &stats, 2, Some(mid))?;
    let winner = refinement_pass(image, &stats, 0, Some(fine))?;
    Ok(winner.into_rgb())
}

/// Gather per-color counts and saturation weights over every pixel. Built
/// once per image, regardless of sampling.
fn build_color_stats(image: &DecodedImage) -> HashMap<Rgb, ColorStats> {
    let mut stats: HashMap<Rgb, ColorStats> = HashMap::new();
    for y in 0..image.height() {
        for x in 0..image.width() {
            let color = pixel_rgb(image, x, y);
            stats
                .entry(color)
                .and_modify(|stat| stat.count += 1)
                .or_insert_with(|| ColorStats {
                    count: 1,
                    weight: saturation_weight(color),
                });
        }
    }
    stats
}

/// Weight favoring saturated (far from gray) colors:
/// `((r-g)^2 + (r-b)^2 + (g-b)^2) / 65535 * 1000 + 1`, floored at a tiny
/// positive epsilon.
fn saturation_weight(color: Rgb) -> f64 {
    let (r, g, b) = (
        i32::from(color.r),
        i32::from(color.g),
        i32::from(color.b),
    );
    let spread = (r - g).pow(2) + (r - b).pow(2) + (g - b).pow(2);
    let weight = f64::from(spread) / 65535.0 * 1000.0 + 1.0;
    if weight <= 0.0 { 1e-10 } else { weight }
}

/// Sampling step for the refinement passes: every 2nd pixel in both axes
/// for images over the threshold, every pixel otherwise. Bounds per-pass
/// cost on large images at the price of quantization accuracy.
fn sample_step(image: &DecodedImage) -> usize {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count > SAMPLE_THRESHOLD { 2 } else { 1 }
}

/// The RGB value of the pixel at `(x, y)`; alpha does not participate in
/// dominant-color analysis.
fn pixel_rgb(image: &DecodedImage, x: u32, y: u32) -> Rgb {
    let [r, g, b, _] = image.pixel(x, y);
    Rgb::new(r, g, b)
}

/// One refinement pass: bucket sampled pixels at `shift` bits of channel
/// reduction, admitting only pixels inside `target`'s neighborhood (all
/// pixels when `target` is `None`), and return the heaviest bucket.
///
/// Each admitted pixel contributes `floor(weight * count * 100) / 100` -
/// fixed two-decimal truncation, a deliberate reproducible numeric choice.
///
/// Buckets live in a `BTreeMap` so the winner is deterministic across runs:
/// strictly greatest accumulated weight, smallest `(shift, r, g, b)` key
/// among exact ties.
fn refinement_pass(
    image: &DecodedImage,
    stats: &HashMap<Rgb, ColorStats>,
    shift: u8,
    target: Option<ShiftedColor>,
) -> Result<ShiftedColor, EmptyImage> {
    let mut buckets: BTreeMap<ShiftedColor, f64> = BTreeMap::new();
    let step = sample_step(image);
    for y in (0..image.height()).step_by(step) {
        for x in (0..image.width()).step_by(step) {
            let color = pixel_rgb(image, x, y);
            if target.is_some_and(|t| !t.contains(color)) {
                continue;
            }
            let Some(stat) = stats.get(&color) else {
                continue;
            };
            let contribution = (stat.weight * f64::from(stat.count) * 100.0).floor() / 100.0;
            *buckets.entry(ShiftedColor::of(color, shift)).or_insert(0.0) += contribution;
        }
    }

    let mut winner: Option<(ShiftedColor, f64)> = None;
    for (&key, &weight) in &buckets {
        match winner {
            Some((_, best)) if weight <= best => {}
            _ => winner = Some((key, weight)),
        }
    }
    winner.map(|(key, _)| key).ok_or(EmptyImage)
}
