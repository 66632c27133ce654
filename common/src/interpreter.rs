//! レスポンス解釈モジュール
//!
//! モザイクAPIのレスポンス本文を画像として解釈する。
//! Content-Typeは欠落・誤りがあり得るため、以下の順で試行する:
//! 1. Content-Typeに "image" を含む場合: 自動判定したコーデックでデコード
//! 2. 失敗またはスキップ時: JPEG → PNG → GIF の順に個別にデコード
//! 3. すべて失敗: `DecodeFailure`
//!
//! I/Oもログ出力も行わない純粋関数。

use image::{DynamicImage, ImageFormat};
use std::fmt;
use thiserror::Error;

/// フォールバック時に試すコーデック（順序固定）
pub const FALLBACK_FORMATS: [ImageFormat; 3] = [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif];

/// どの経路でデコードに成功したか
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodePath {
    /// Content-Typeが画像を示していた
    Declared,
    /// 候補コーデックの総当たり
    Fallback,
}

/// 1回分のデコード試行（失敗記録）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeAttempt {
    /// 試したコーデック（判定できなかった場合はNone）
    pub format: Option<ImageFormat>,
    pub error: String,
}

impl fmt::Display for DecodeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.format {
            Some(format) => write!(f, "{}: {}", format_name(format), self.error),
            None => write!(f, "auto: {}", self.error),
        }
    }
}

/// デコード成功結果
#[derive(Debug, Clone)]
pub struct DecodedRaster {
    pub image: DynamicImage,
    pub format: ImageFormat,
    pub path: DecodePath,
    /// 成功までに失敗した試行
    pub attempts: Vec<DecodeAttempt>,
}

impl DecodedRaster {
    pub fn dimensions(&self) -> (u32, u32) {
        (self.image.width(), self.image.height())
    }
}

/// 全コーデックで失敗
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("content not recognized as an image")]
pub struct DecodeFailure {
    pub attempts: Vec<DecodeAttempt>,
}

impl DecodeFailure {
    /// 試行内容を1行にまとめる（デバッグ表示用）
    pub fn summary(&self) -> String {
        self.attempts
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// レスポンス本文を画像として解釈
pub fn interpret_response(bytes: &[u8], content_type: &str) -> Result<DecodedRaster, DecodeFailure> {
    let mut attempts = Vec::new();

    if content_type.contains("image") {
        match decode_declared(bytes, content_type) {
            Ok((image, format)) => {
                return Ok(DecodedRaster {
                    image,
                    format,
                    path: DecodePath::Declared,
                    attempts,
                });
            }
            Err(attempt) => attempts.push(attempt),
        }
    }

    for format in FALLBACK_FORMATS {
        match image::load_from_memory_with_format(bytes, format) {
            Ok(image) => {
                return Ok(DecodedRaster {
                    image,
                    format,
                    path: DecodePath::Fallback,
                    attempts,
                });
            }
            Err(e) => attempts.push(DecodeAttempt {
                format: Some(format),
                error: e.to_string(),
            }),
        }
    }

    Err(DecodeFailure { attempts })
}

/// マジックバイトで判定し、判定不能ならContent-Typeのコーデックを使う
fn decode_declared(bytes: &[u8], content_type: &str) -> Result<(DynamicImage, ImageFormat), DecodeAttempt> {
    let format = image::guess_format(bytes)
        .ok()
        .or_else(|| format_from_content_type(content_type));

    let Some(format) = format else {
        return Err(DecodeAttempt {
            format: None,
            error: format!("format could not be detected (content-type: {})", content_type),
        });
    };

    image::load_from_memory_with_format(bytes, format)
        .map(|image| (image, format))
        .map_err(|e| DecodeAttempt {
            format: Some(format),
            error: e.to_string(),
        })
}

/// "image/png; charset=..." のようなパラメータ付きも受け付ける
fn format_from_content_type(content_type: &str) -> Option<ImageFormat> {
    let mime = content_type.split(';').next()?.trim().to_ascii_lowercase();
    ImageFormat::from_mime_type(mime)
}

pub fn format_name(format: ImageFormat) -> String {
    format!("{:?}", format).to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    fn red_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([255, 0, 0])))
    }

    fn encode(image: &DynamicImage, format: ImageFormat) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        image.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        encode(&red_rgb(width, height), ImageFormat::Png)
    }

    fn jpeg_bytes(width: u32, height: u32) -> Vec<u8> {
        encode(&red_rgb(width, height), ImageFormat::Jpeg)
    }

    fn gif_bytes(width: u32, height: u32) -> Vec<u8> {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255])));
        encode(&rgba, ImageFormat::Gif)
    }

    #[test]
    fn test_declared_png_decodes_on_fast_path() {
        let decoded = interpret_response(&png_bytes(10, 10), "image/png").unwrap();
        assert_eq!(decoded.path, DecodePath::Declared);
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.dimensions(), (10, 10));
        assert!(decoded.attempts.is_empty());
    }

    #[test]
    fn test_declared_type_with_parameters() {
        let decoded = interpret_response(&jpeg_bytes(7, 3), "image/jpeg; charset=binary").unwrap();
        assert_eq!(decoded.path, DecodePath::Declared);
        assert_eq!(decoded.dimensions(), (7, 3));
    }

    #[test]
    fn test_mislabeled_content_type_uses_detected_codec() {
        // Content-Typeはpngだが中身はJPEG
        let decoded = interpret_response(&jpeg_bytes(12, 8), "image/png").unwrap();
        assert_eq!(decoded.path, DecodePath::Declared);
        assert_eq!(decoded.format, ImageFormat::Jpeg);
        assert_eq!(decoded.dimensions(), (12, 8));
    }

    #[test]
    fn test_jpeg_without_content_type_uses_fallback() {
        let decoded = interpret_response(&jpeg_bytes(16, 9), "").unwrap();
        assert_eq!(decoded.path, DecodePath::Fallback);
        assert_eq!(decoded.format, ImageFormat::Jpeg);
        assert_eq!(decoded.dimensions(), (16, 9));
        assert!(decoded.attempts.is_empty());
    }

    #[test]
    fn test_png_with_unrelated_content_type_uses_fallback() {
        let decoded = interpret_response(&png_bytes(5, 6), "application/octet-stream").unwrap();
        assert_eq!(decoded.path, DecodePath::Fallback);
        assert_eq!(decoded.format, ImageFormat::Png);
        assert_eq!(decoded.dimensions(), (5, 6));
    }

    #[test]
    fn test_fallback_order_is_jpeg_png_gif() {
        assert_eq!(
            FALLBACK_FORMATS,
            [ImageFormat::Jpeg, ImageFormat::Png, ImageFormat::Gif]
        );

        // PNGはJPEGの失敗後に採用される
        let png = interpret_response(&png_bytes(4, 4), "").unwrap();
        let tried: Vec<_> = png.attempts.iter().map(|a| a.format).collect();
        assert_eq!(tried, vec![Some(ImageFormat::Jpeg)]);

        // GIFはJPEG, PNGの失敗後に採用される
        let gif = interpret_response(&gif_bytes(3, 2), "text/plain").unwrap();
        assert_eq!(gif.format, ImageFormat::Gif);
        assert_eq!(gif.dimensions(), (3, 2));
        let tried: Vec<_> = gif.attempts.iter().map(|a| a.format).collect();
        assert_eq!(tried, vec![Some(ImageFormat::Jpeg), Some(ImageFormat::Png)]);
    }

    #[test]
    fn test_text_payload_fails() {
        let body = br#"{"detail": "Internal Server Error"}"#;
        let err = interpret_response(body, "application/json").unwrap_err();
        assert_eq!(err.to_string(), "content not recognized as an image");
        assert_eq!(err.attempts.len(), FALLBACK_FORMATS.len());
    }

    #[test]
    fn test_text_payload_with_image_content_type_fails() {
        let err = interpret_response(b"not really a png", "image/png").unwrap_err();
        // 高速パス + フォールバック3種
        assert_eq!(err.attempts.len(), 4);
        assert_eq!(err.attempts[0].format, Some(ImageFormat::Png));
        assert!(err.summary().contains("JPEG"));
        assert!(err.summary().contains("GIF"));
    }

    #[test]
    fn test_svg_content_type_is_not_a_raster() {
        let svg = br#"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10"></svg>"#;
        let err = interpret_response(svg, "image/svg+xml").unwrap_err();
        assert_eq!(err.attempts[0].format, None);
        assert!(err.attempts[0].to_string().starts_with("auto:"));
    }

    #[test]
    fn test_empty_body_fails() {
        assert!(interpret_response(&[], "").is_err());
        assert!(interpret_response(&[], "image/jpeg").is_err());
    }

    #[test]
    fn test_format_name() {
        assert_eq!(format_name(ImageFormat::Jpeg), "JPEG");
        assert_eq!(format_name(ImageFormat::Gif), "GIF");
    }
}
