use mosaic_art_common::{DecodeFailure, FailureReason};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MosaicError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("対応していない画像形式です: {0}（JPG, JPEG, PNGのみ）")]
    UnsupportedImage(String),

    #[error("画像読み込みエラー: {0}")]
    ImageLoad(String),

    #[error("APIへの接続に失敗: {0}")]
    Transport(String),

    #[error("APIがステータスコード {status} を返しました")]
    Service { status: u16 },

    #[error("レスポンスを画像として処理できません: {0}")]
    Decode(DecodeFailure),

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] mosaic_art_common::Error),
}

impl From<reqwest::Error> for MosaicError {
    fn from(err: reqwest::Error) -> Self {
        MosaicError::Transport(err.to_string())
    }
}

impl From<FailureReason> for MosaicError {
    fn from(reason: FailureReason) -> Self {
        match reason {
            FailureReason::Transport(msg) => MosaicError::Transport(msg),
            FailureReason::Service { status } => MosaicError::Service { status },
            FailureReason::Decode(failure) => MosaicError::Decode(failure),
        }
    }
}

pub type Result<T> = std::result::Result<T, MosaicError>;
