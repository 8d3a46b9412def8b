//! Integration tests for icon export.

mod common;

use common::{build_ico, encode, solid};
use emblem_common::icon::{DecodedImage, Icon};
use emblem_engine::decoder::ContainerDecoder;
use emblem_engine::export::{ExportError, save_embedded_in_dir, save_raw_in_dir, write_image};
use image::ImageFormat;
use url::Url;

/// Helper: a 2x2 decoded image with the given format tag.
fn decoded(format: &str) -> DecodedImage {
    let pixels = solid(2, 2, [10, 20, 30, 255]);
    DecodedImage::new(0, format.to_string(), 2, 2, pixels.into_raw())
}

/// Helper: an icon summary pointing at a local file.
fn local_icon(path: &std::path::Path) -> Icon {
    Icon {
        url: Url::from_file_path(path).unwrap(),
        images: Vec::new(),
    }
}

#[test]
fn test_write_image_rewrites_the_extension() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("0_0_favicon.ico");

    assert!(write_image(&decoded("png"), &target));
    let written = dir.path().join("0_0_favicon.png");
    assert!(written.is_file());
    assert!(image::open(&written).is_ok());
}

#[test]
fn test_write_image_ico_tag_prefers_png() {
    // An "ico"-tagged image is only guaranteed to be PNG or BMP; PNG is
    // attempted first and succeeds for any RGBA buffer.
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("entry.ico");

    assert!(write_image(&decoded("ico"), &target));
    assert!(dir.path().join("entry.png").is_file());
    assert!(!dir.path().join("entry.bmp").exists());
}

#[test]
fn test_save_raw_in_dir_prefixes_processing_order() {
    let source = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let png = encode(&solid(4, 4, [1, 2, 3, 255]), ImageFormat::Png);
    let path = source.path().join("favicon.png");
    std::fs::write(&path, &png).unwrap();

    let icons = vec![local_icon(&path), local_icon(&path)];
    save_raw_in_dir(&icons, out.path()).unwrap();

    let first = out.path().join("0_favicon.png");
    let second = out.path().join("1_favicon.png");
    assert_eq!(std::fs::read(&first).unwrap(), png);
    assert_eq!(std::fs::read(&second).unwrap(), png);
}

#[test]
fn test_save_embedded_in_dir_writes_every_entry() {
    let source = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();

    let payloads = vec![
        encode(&solid(4, 4, [5, 5, 5, 255]), ImageFormat::Png),
        encode(&solid(2, 2, [6, 6, 6, 255]), ImageFormat::Png),
    ];
    let ico = build_ico(&payloads, &[(4, 4), (2, 2)]);
    let path = source.path().join("favicon.ico");
    std::fs::write(&path, &ico).unwrap();

    save_embedded_in_dir(&[local_icon(&path)], out.path(), &ContainerDecoder::new()).unwrap();

    assert!(out.path().join("0_0_favicon.png").is_file());
    assert!(out.path().join("0_1_favicon.png").is_file());
}

#[test]
fn test_png_round_trip_preserves_dimensions() {
    let dir = tempfile::tempdir().unwrap();
    let target = dir.path().join("icon.png");

    assert!(write_image(&decoded("png"), &target));
    let reread = std::fs::read(&target).unwrap();
    let images = ContainerDecoder::new().decode_all(&reread, Some("png")).unwrap();
    assert_eq!((images[0].width(), images[0].height()), (2, 2));
}

#[test]
fn test_target_must_be_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("not-a-dir");
    std::fs::write(&file, b"x").unwrap();

    let err = save_raw_in_dir(&[], &file).unwrap_err();
    assert!(matches!(err, ExportError::NotADirectory(_)));
}
