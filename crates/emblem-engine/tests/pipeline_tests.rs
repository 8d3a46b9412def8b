//! End-to-end pipeline tests over local `file:` sites.

mod common;

use common::{encode, solid};
use emblem_color::Rgb;
use emblem_engine::letter::LetterIconRenderer;
use emblem_engine::IconPipeline;
use image::ImageFormat;
use std::path::Path;
use url::Url;

/// Helper: write a site directory with an index document and return the
/// index's `file:` URL.
fn write_site(dir: &Path, html: &str) -> String {
    let index = dir.join("index.html");
    std::fs::write(&index, html).unwrap();
    Url::from_file_path(&index).unwrap().to_string()
}

#[test]
fn test_discovery_over_a_local_site() {
    let dir = tempfile::tempdir().unwrap();
    let location = write_site(
        dir.path(),
        r#"<html><head><link rel="icon" href="logo.png"></head></html>"#,
    );

    let links = IconPipeline::new().discover(&location).unwrap();
    assert_eq!(links.len(), 4);
    assert!(links[0].url().as_str().ends_with("favicon.ico"));
    assert!(links[3].url().as_str().ends_with("logo.png"));
}

#[test]
fn test_retrieve_all_drops_missing_candidates() {
    let dir = tempfile::tempdir().unwrap();
    let location = write_site(
        dir.path(),
        r#"<html><head><link rel="icon" href="logo.png"></head></html>"#,
    );
    let logo = encode(&solid(8, 8, [0xc8, 0x10, 0x10, 0xff]), ImageFormat::Png);
    std::fs::write(dir.path().join("logo.png"), logo).unwrap();

    // The three conventional paths do not exist on disk and are dropped;
    // only the tag-derived logo survives.
    let icons = IconPipeline::new().retrieve_all(&location).unwrap();
    assert_eq!(icons.len(), 1);
    assert!(icons[0].url.as_str().ends_with("logo.png"));
    assert_eq!(icons[0].images.len(), 1);
    assert_eq!(icons[0].images[0].format, "png");
    assert_eq!(icons[0].images[0].width, 8);
    assert_eq!(icons[0].images[0].height, 8);
}

#[test]
fn test_undecodable_candidates_are_dropped() {
    let dir = tempfile::tempdir().unwrap();
    let location = write_site(
        dir.path(),
        r#"<html><head><link rel="icon" href="junk.bin"></head></html>"#,
    );
    std::fs::write(dir.path().join("junk.bin"), b"certainly not an image").unwrap();

    let icons = IconPipeline::new().retrieve_all(&location).unwrap();
    assert!(icons.is_empty());
}

#[test]
fn test_letter_icon_takes_the_favicon_dominant_color() {
    let dir = tempfile::tempdir().unwrap();
    let location = write_site(
        dir.path(),
        r#"<html><head><link rel="icon" href="logo.png"></head></html>"#,
    );
    let logo = encode(&solid(8, 8, [0xc8, 0x10, 0x10, 0xff]), ImageFormat::Png);
    std::fs::write(dir.path().join("logo.png"), logo).unwrap();

    let renderer = LetterIconRenderer::new();
    let image = IconPipeline::new()
        .letter_icon_for(&renderer, &location, Rgb::new(0, 0, 255), 64)
        .unwrap();
    assert_eq!(image.dimensions(), (64, 64));
    // A point just inside the circle's top edge is pure background, and
    // the background is the logo's dominant color, not the fallback.
    assert_eq!(image.get_pixel(32, 3).0, [0xc8, 0x10, 0x10, 255]);
}

#[test]
fn test_letter_icon_falls_back_when_no_favicon_exists() {
    let dir = tempfile::tempdir().unwrap();
    let location = write_site(dir.path(), "<html><head></head></html>");

    let renderer = LetterIconRenderer::new();
    let image = IconPipeline::new()
        .letter_icon_for(&renderer, &location, Rgb::new(0, 0, 255), 64)
        .unwrap();
    assert_eq!(image.get_pixel(32, 3).0, [0, 0, 255, 255]);
}

#[test]
fn test_malformed_location_fails_the_run() {
    assert!(IconPipeline::new().retrieve_all("not a url").is_err());
}
