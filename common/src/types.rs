//! アップロード1回分の型定義
//!
//! CLIとデスクトップUIで共有される型:
//! - SourceImage: ユーザーがアップロードした元画像
//! - ProcessingRequest: APIへ送るマルチパートの中身
//! - ProcessingResult: 解釈結果（Decoded / Failed）
//! - CycleOutcome: 1サイクルで得たものすべて

use crate::debug::DebugSnapshot;
use crate::error::{Error, Result};
use crate::interpreter::{DecodeFailure, DecodedRaster};
use std::fmt;

/// マルチパートのフィールド名
pub const UPLOAD_FIELD_NAME: &str = "file";
/// 送信時のファイル名（元のファイル名は送らない）
pub const UPLOAD_FILE_NAME: &str = "image.jpg";
/// 送信時のMIMEタイプ（元の形式に関係なく固定）
pub const UPLOAD_MIME_TYPE: &str = "image/jpeg";

/// アップロード可能な拡張子
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// アップロードされた元画像（生成後は不変）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    file_name: String,
    media_type: String,
    bytes: Vec<u8>,
    /// 読み込み時に一度だけ測った (幅, 高さ)
    dimensions: Option<(u32, u32)>,
}

impl SourceImage {
    /// ファイル名の拡張子からMIMEタイプを決定
    pub fn from_file_name(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let media_type = media_type_for(&file_name)
            .ok_or_else(|| Error::UnsupportedFormat(file_name.clone()))?;

        Ok(Self {
            file_name,
            media_type: media_type.to_string(),
            bytes,
            dimensions: None,
        })
    }

    /// デコード済みのサイズを記録する
    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.dimensions = Some((width, height));
        self
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn media_type(&self) -> &str {
        &self.media_type
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.dimensions
    }
}

/// 拡張子（大文字小文字を区別しない）からMIMEタイプを返す
pub fn media_type_for(file_name: &str) -> Option<&'static str> {
    let ext = file_name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        _ => None,
    }
}

/// API送信用リクエスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessingRequest {
    pub field_name: &'static str,
    pub file_name: &'static str,
    pub media_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ProcessingRequest {
    pub fn from_source(source: &SourceImage) -> Self {
        Self {
            field_name: UPLOAD_FIELD_NAME,
            file_name: UPLOAD_FILE_NAME,
            media_type: UPLOAD_MIME_TYPE,
            bytes: source.bytes().to_vec(),
        }
    }
}

/// 失敗理由
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// 通信自体が完了しなかった（DNS、接続拒否、タイムアウト等）
    Transport(String),
    /// ラスタ呼び出しが200以外を返した
    Service { status: u16 },
    /// 200だが画像として解釈できなかった
    Decode(DecodeFailure),
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::Transport(msg) => write!(f, "Error connecting to the API: {}", msg),
            FailureReason::Service { status } => {
                write!(f, "Error: API returned status code {}", status)
            }
            FailureReason::Decode(failure) => {
                write!(f, "Could not process response as an image: {}", failure)
            }
        }
    }
}

/// デコード済みモザイク画像とSVG（任意）
#[derive(Debug, Clone)]
pub struct DecodedMosaic {
    pub raster: DecodedRaster,
    pub svg: Option<String>,
}

/// 1回のアップロードの結果
#[derive(Debug, Clone)]
pub enum ProcessingResult {
    Decoded(DecodedMosaic),
    Failed(FailureReason),
}

impl ProcessingResult {
    pub fn is_decoded(&self) -> bool {
        matches!(self, ProcessingResult::Decoded(_))
    }

    pub fn mosaic(&self) -> Option<&DecodedMosaic> {
        match self {
            ProcessingResult::Decoded(mosaic) => Some(mosaic),
            ProcessingResult::Failed(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReason> {
        match self {
            ProcessingResult::Decoded(_) => None,
            ProcessingResult::Failed(reason) => Some(reason),
        }
    }
}

/// 1サイクル分の成果物
#[derive(Debug, Clone)]
pub struct CycleOutcome {
    pub source: SourceImage,
    /// 通信失敗時はNone
    pub snapshot: Option<DebugSnapshot>,
    /// ラスタ呼び出しの生レスポンス本文（保存用）
    pub raw_body: Option<Vec<u8>>,
    pub result: ProcessingResult,
}
