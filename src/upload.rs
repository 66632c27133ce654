//! アップロード画像の読み込み
//!
//! JPG/JPEG/PNGのみ受け付け、元画像として表示できることを送信前に確認する。

use crate::error::{MosaicError, Result};
use mosaic_art_common::types::media_type_for;
use mosaic_art_common::SourceImage;
use std::path::Path;

pub fn load_source_image(path: &Path) -> Result<SourceImage> {
    if !path.is_file() {
        return Err(MosaicError::FileNotFound(path.display().to_string()));
    }

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    if media_type_for(&file_name).is_none() {
        return Err(MosaicError::UnsupportedImage(file_name));
    }

    let bytes = std::fs::read(path)?;

    // 元画像ペインに表示できないものは送らない
    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| MosaicError::ImageLoad(format!("{}: {}", file_name, e)))?;
    let (width, height) = (decoded.width(), decoded.height());

    Ok(SourceImage::from_file_name(file_name, bytes)?.with_dimensions(width, height))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use tempfile::tempdir;

    fn write_png(path: &Path) {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, Rgb([10, 20, 30])))
            .save_with_format(path, ImageFormat::Png)
            .unwrap();
    }

    #[test]
    fn test_load_png() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.PNG");
        write_png(&path);

        let source = load_source_image(&path).unwrap();
        assert_eq!(source.file_name(), "input.PNG");
        assert_eq!(source.media_type(), "image/png");
        assert!(!source.bytes().is_empty());
        assert_eq!(source.dimensions(), Some((3, 3)));
    }

    #[test]
    fn test_file_not_found() {
        let result = load_source_image(Path::new("/nonexistent/photo.jpg"));
        assert!(matches!(result, Err(MosaicError::FileNotFound(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("anim.gif");
        std::fs::write(&path, b"GIF89a").unwrap();

        let result = load_source_image(&path);
        assert!(matches!(result, Err(MosaicError::UnsupportedImage(name)) if name == "anim.gif"));
    }

    #[test]
    fn test_corrupt_image_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.jpg");
        std::fs::write(&path, b"dummy").unwrap();

        let result = load_source_image(&path);
        assert!(matches!(result, Err(MosaicError::ImageLoad(_))));
    }
}
