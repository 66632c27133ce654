//! 再エンコードモジュール
//!
//! ダウンロード用にデコード済み画像をPNG/JPEGへ書き出す。

use crate::error::Result;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;

/// JPEG品質のデフォルト (0-100)
pub const DEFAULT_JPEG_QUALITY: u8 = 90;

/// PNG（可逆）
pub fn encode_png(image: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    image.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// JPEG（アルファは捨ててRGBで書き出す）
pub fn encode_jpeg(image: &DynamicImage, quality: u8) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
    DynamicImage::ImageRgb8(image.to_rgb8()).write_with_encoder(encoder)?;
    Ok(buf)
}
