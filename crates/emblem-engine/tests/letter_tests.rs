//! Integration tests for letter-icon rendering.

use emblem_color::Rgb;
use emblem_engine::letter::{LetterIcon, LetterIconRenderer};

const BACKGROUND: Rgb = Rgb::new(200, 30, 30);

#[test]
fn test_rendered_icon_has_requested_size() {
    let renderer = LetterIconRenderer::new();
    let image = renderer.render(&LetterIcon::new(64, 'e', BACKGROUND));
    assert_eq!(image.dimensions(), (64, 64));
}

#[test]
fn test_rendering_is_deterministic_across_renderers() {
    // Two independently constructed renderers must produce byte-identical
    // output for identical inputs.
    let icon = LetterIcon::new(48, 'g', BACKGROUND);
    let first = LetterIconRenderer::new().render(&icon);
    let second = LetterIconRenderer::new().render(&icon);
    assert_eq!(first.as_raw(), second.as_raw());
}

#[test]
fn test_corners_are_transparent() {
    let renderer = LetterIconRenderer::new();
    let image = renderer.render(&LetterIcon::new(64, 'e', BACKGROUND));
    assert_eq!(image.get_pixel(0, 0).0[3], 0);
    assert_eq!(image.get_pixel(63, 0).0[3], 0);
    assert_eq!(image.get_pixel(0, 63).0[3], 0);
    assert_eq!(image.get_pixel(63, 63).0[3], 0);
}

#[test]
fn test_circle_interior_is_the_background_color() {
    // A space rasterizes to an empty glyph, leaving the circle untouched.
    let renderer = LetterIconRenderer::new();
    let image = renderer.render(&LetterIcon::new(64, ' ', BACKGROUND));
    let center = image.get_pixel(32, 32).0;
    assert_eq!(center, [200, 30, 30, 255]);
}

#[test]
fn test_glyph_leaves_the_circle_top_untouched() {
    // The glyph sits on a baseline well below the circle's top edge; a
    // point just inside the top of the circle stays pure background.
    let renderer = LetterIconRenderer::new();
    let image = renderer.render(&LetterIcon::new(64, 'A', BACKGROUND));
    assert_eq!(image.get_pixel(32, 3).0, [200, 30, 30, 255]);
}

#[test]
fn test_zero_size_renders_an_empty_canvas() {
    let renderer = LetterIconRenderer::new();
    let image = renderer.render(&LetterIcon::new(0, 'x', BACKGROUND));
    assert_eq!(image.dimensions(), (0, 0));
}
