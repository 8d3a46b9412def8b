//! Dominant-color analysis for the emblem favicon toolkit.
//!
//! Two pure algorithms used when synthesizing fallback letter icons:
//! - **finder** - the iterative bucket-refinement search for an image's
//!   single dominant color
//! - **contrast** - the two-tier foreground selection rule

pub mod contrast;
pub mod finder;
mod rgb;

pub use finder::{EmptyImage, find_main_color};
pub use rgb::{ParseRgbError, Rgb};
