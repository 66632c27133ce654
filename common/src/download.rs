//! ダウンロード成果物モジュール
//!
//! ファイル名は `mosaic_art_YYYYMMDD_HHMMSS.<拡張子>`。
//! 1回の表示で作る成果物はすべて同じタイムスタンプを共有する。

use crate::encode::{encode_jpeg, encode_png};
use crate::error::Result;
use crate::types::DecodedMosaic;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDateTime;

pub const DOWNLOAD_PREFIX: &str = "mosaic_art";
pub const RAW_RESPONSE_PREFIX: &str = "response";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadKind {
    Png,
    Jpg,
    Svg,
}

impl DownloadKind {
    pub const ALL: [DownloadKind; 3] = [DownloadKind::Png, DownloadKind::Jpg, DownloadKind::Svg];

    pub fn extension(&self) -> &'static str {
        match self {
            DownloadKind::Png => "png",
            DownloadKind::Jpg => "jpg",
            DownloadKind::Svg => "svg",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            DownloadKind::Png => "image/png",
            DownloadKind::Jpg => "image/jpeg",
            DownloadKind::Svg => "image/svg+xml",
        }
    }

    /// ボタン・リンクの表示名
    pub fn label(&self) -> &'static str {
        match self {
            DownloadKind::Png => "Download as PNG",
            DownloadKind::Jpg => "Download as JPG",
            DownloadKind::Svg => "Download as SVG",
        }
    }
}

/// `YYYYMMDD_HHMMSS`
pub fn timestamp_string(timestamp: NaiveDateTime) -> String {
    timestamp.format("%Y%m%d_%H%M%S").to_string()
}

pub fn download_file_name(kind: DownloadKind, timestamp: NaiveDateTime) -> String {
    format!("{}_{}.{}", DOWNLOAD_PREFIX, timestamp_string(timestamp), kind.extension())
}

/// 生レスポンス保存用のファイル名
pub fn raw_response_file_name(timestamp: NaiveDateTime) -> String {
    format!("{}_{}.bin", RAW_RESPONSE_PREFIX, timestamp_string(timestamp))
}

/// ダウンロード1件分
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub kind: DownloadKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl DownloadArtifact {
    /// `data:` URL（HTMLレポートのリンク用）
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.kind.mime_type(), STANDARD.encode(&self.bytes))
    }
}

/// 要求された種類の成果物を作成
///
/// SVGがない場合は黙って省く。
pub fn build_downloads(
    mosaic: &DecodedMosaic,
    kinds: &[DownloadKind],
    timestamp: NaiveDateTime,
    jpeg_quality: u8,
) -> Result<Vec<DownloadArtifact>> {
    let mut artifacts = Vec::new();

    for &kind in kinds {
        let bytes = match kind {
            DownloadKind::Png => encode_png(&mosaic.raster.image)?,
            DownloadKind::Jpg => encode_jpeg(&mosaic.raster.image, jpeg_quality)?,
            DownloadKind::Svg => match &mosaic.svg {
                Some(svg) => svg.as_bytes().to_vec(),
                None => continue,
            },
        };

        artifacts.push(DownloadArtifact {
            kind,
            file_name: download_file_name(kind, timestamp),
            bytes,
        });
    }

    Ok(artifacts)
}
