//! Integration tests for the dominant-color finder.

use emblem_color::{Rgb, find_main_color};
use emblem_common::icon::DecodedImage;

/// Helper: build an image from per-pixel RGB values, row-major.
fn image_from_pixels(width: u32, height: u32, pixels: &[Rgb]) -> DecodedImage {
    assert_eq!(pixels.len(), (width * height) as usize);
    let mut rgba = Vec::with_capacity(pixels.len() * 4);
    for color in pixels {
        rgba.extend_from_slice(&[color.r, color.g, color.b, 255]);
    }
    DecodedImage::new(0, "png".to_string(), width, height, rgba)
}

/// Helper: build a solid image of one color.
fn solid(width: u32, height: u32, color: Rgb) -> DecodedImage {
    image_from_pixels(width, height, &vec![color; (width * height) as usize])
}

#[test]
fn test_single_white_pixel() {
    let image = solid(1, 1, Rgb::new(255, 255, 255));
    assert_eq!(find_main_color(&image).unwrap(), Rgb::new(255, 255, 255));
}

#[test]
fn test_single_black_pixel() {
    let image = solid(1, 1, Rgb::new(0, 0, 0));
    assert_eq!(find_main_color(&image).unwrap(), Rgb::new(0, 0, 0));
}

#[test]
fn test_empty_image_is_rejected() {
    let image = DecodedImage::new(0, "png".to_string(), 0, 0, Vec::new());
    assert!(find_main_color(&image).is_err());
}

#[test]
fn test_solid_color_is_found_exactly() {
    let image = solid(16, 16, Rgb::new(0xf4, 0x80, 0x24));
    assert_eq!(
        find_main_color(&image).unwrap(),
        Rgb::new(0xf4, 0x80, 0x24)
    );
}

#[test]
fn test_saturated_accent_beats_larger_gray_field() {
    // Three mid-gray pixels (weight ~1 each) against one vivid red pixel
    // (weight ~1985): the saturation weighting hands the red the win.
    let gray = Rgb::new(128, 128, 128);
    let red = Rgb::new(255, 0, 0);
    let image = image_from_pixels(2, 2, &[gray, gray, gray, red]);
    assert_eq!(find_main_color(&image).unwrap(), red);
}

#[test]
fn test_majority_wins_between_equally_saturated_colors() {
    let blue = Rgb::new(0, 0, 255);
    let green = Rgb::new(0, 255, 0);
    let image = image_from_pixels(2, 2, &[blue, blue, blue, green]);
    assert_eq!(find_main_color(&image).unwrap(), blue);
}

#[test]
fn test_large_images_sample_every_second_pixel() {
    // 200x200 exceeds the 180x180 sampling threshold, so the refinement
    // passes only visit even coordinates. Paint those red and everything
    // else white: only red is ever admitted to a bucket.
    let red = Rgb::new(255, 0, 0);
    let white = Rgb::new(255, 255, 255);
    let mut pixels = Vec::with_capacity(200 * 200);
    for y in 0..200u32 {
        for x in 0..200u32 {
            if x % 2 == 0 && y % 2 == 0 {
                pixels.push(red);
            } else {
                pixels.push(white);
            }
        }
    }
    let image = image_from_pixels(200, 200, &pixels);
    assert_eq!(find_main_color(&image).unwrap(), red);
}

#[test]
fn test_tie_break_is_deterministic() {
    // Two near-black grays share every coarse bucket and tie on weight in
    // the shift-4 pass; the documented tie-break (smallest shifted key)
    // must pick the darker one, every run.
    let darker = Rgb::new(10, 10, 10);
    let lighter = Rgb::new(20, 20, 20);
    let image = image_from_pixels(2, 1, &[lighter, darker]);
    for _ in 0..8 {
        assert_eq!(find_main_color(&image).unwrap(), darker);
    }
}

#[test]
fn test_refinement_follows_the_dominant_neighborhood() {
    // A dominant cluster of similar blues plus a lone yellow: the winner
    // must be the most frequent exact blue, not a blend and not the yellow.
    let navy = Rgb::new(0x0f, 0x2e, 0x64);
    let near_navy = Rgb::new(0x10, 0x2f, 0x66);
    let yellow = Rgb::new(0xff, 0xd7, 0x00);
    let image = image_from_pixels(
        3,
        2,
        &[navy, navy, navy, near_navy, near_navy, yellow],
    );
    assert_eq!(find_main_color(&image).unwrap(), navy);
}
