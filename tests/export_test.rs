//! ダウンロード成果物・生レスポンス保存の統合テスト

use chrono::NaiveDate;
use image::{DynamicImage, GenericImageView, ImageFormat, Rgb, RgbImage};
use mosaic_art::export::{save_downloads, save_raw_response};
use mosaic_art_common::{
    build_downloads, interpret_response, DecodedMosaic, DownloadKind,
};
use std::io::Cursor;
use tempfile::tempdir;

fn timestamp() -> chrono::NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, 18)
        .unwrap()
        .and_hms_opt(15, 30, 45)
        .unwrap()
}

fn mosaic(svg: Option<&str>) -> DecodedMosaic {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(10, 10, Rgb([255, 0, 0])));
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png).unwrap();

    DecodedMosaic {
        raster: interpret_response(&buf.into_inner(), "image/png").unwrap(),
        svg: svg.map(str::to_string),
    }
}

#[test]
fn test_save_all_downloads() {
    let dir = tempdir().expect("Failed to create temp dir");
    let output_dir = dir.path().join("out");

    let artifacts = build_downloads(&mosaic(Some("<svg/>")), &DownloadKind::ALL, timestamp(), 90).unwrap();
    let paths = save_downloads(&artifacts, &output_dir).unwrap();

    let names: Vec<_> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
        .collect();
    assert_eq!(
        names,
        vec![
            "mosaic_art_20260118_153045.png",
            "mosaic_art_20260118_153045.jpg",
            "mosaic_art_20260118_153045.svg",
        ]
    );

    // 保存したPNG/JPGは10x10のまま読み戻せる
    let png = image::open(&paths[0]).expect("PNG読み込み失敗");
    assert_eq!(png.dimensions(), (10, 10));
    let jpg = image::open(&paths[1]).expect("JPG読み込み失敗");
    assert_eq!(jpg.dimensions(), (10, 10));
    assert_eq!(std::fs::read_to_string(&paths[2]).unwrap(), "<svg/>");
}

#[test]
fn test_save_without_svg() {
    let dir = tempdir().expect("Failed to create temp dir");

    let artifacts = build_downloads(&mosaic(None), &DownloadKind::ALL, timestamp(), 90).unwrap();
    let paths = save_downloads(&artifacts, dir.path()).unwrap();

    assert_eq!(paths.len(), 2);
    assert!(!dir.path().join("mosaic_art_20260118_153045.svg").exists());
}

#[test]
fn test_save_raw_response_creates_debug_dir() {
    let dir = tempdir().expect("Failed to create temp dir");
    let debug_dir = dir.path().join("debug");

    let path = save_raw_response(b"\x00\x01raw", &debug_dir, timestamp()).unwrap();

    assert_eq!(path, debug_dir.join("response_20260118_153045.bin"));
    assert_eq!(std::fs::read(&path).unwrap(), b"\x00\x01raw");
}

#[test]
fn test_save_raw_response_failure_is_reported() {
    let dir = tempdir().expect("Failed to create temp dir");
    // ファイルがある場所にはディレクトリを作れない
    let blocker = dir.path().join("debug");
    std::fs::write(&blocker, b"not a directory").unwrap();

    let result = save_raw_response(b"raw", &blocker, timestamp());
    assert!(result.is_err());
}
