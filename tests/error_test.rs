//! エラーケーステスト
//!
//! 各種エラー条件でのエラーハンドリングを検証

use mosaic_art::error::MosaicError;
use mosaic_art::upload;
use mosaic_art_common::{DecodeFailure, FailureReason};
use std::path::Path;
use tempfile::tempdir;

/// 存在しない画像を指定した場合
#[test]
fn test_load_nonexistent_image() {
    let result = upload::load_source_image(Path::new("/nonexistent/path/12345.jpg"));
    assert!(result.is_err());

    let err = result.unwrap_err();
    assert!(matches!(err, MosaicError::FileNotFound(_)));
}

/// フォルダを指定した場合
#[test]
fn test_load_directory_instead_of_file() {
    let dir = tempdir().expect("Failed to create temp dir");
    let result = upload::load_source_image(dir.path());
    assert!(matches!(result, Err(MosaicError::FileNotFound(_))));
}

/// 対応外の拡張子
#[test]
fn test_load_unsupported_extension() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("scan.bmp");
    std::fs::write(&path, b"BM").unwrap();

    let result = upload::load_source_image(&path);
    assert!(matches!(result, Err(MosaicError::UnsupportedImage(_))));
}

/// MosaicErrorのDisplay実装確認
#[test]
fn test_error_display() {
    let errors = vec![
        MosaicError::Config("テスト設定エラー".to_string()),
        MosaicError::FileNotFound("test.jpg".to_string()),
        MosaicError::UnsupportedImage("test.gif".to_string()),
        MosaicError::ImageLoad("壊れた画像".to_string()),
        MosaicError::Transport("connection refused".to_string()),
        MosaicError::Service { status: 502 },
        MosaicError::Decode(DecodeFailure { attempts: vec![] }),
    ];

    for err in errors {
        let display = format!("{}", err);
        assert!(!display.is_empty(), "エラーメッセージが空: {:?}", err);
    }
}

/// 失敗理由からの変換（種類ごとに区別される）
#[test]
fn test_failure_reason_conversion() {
    let err: MosaicError = FailureReason::Service { status: 500 }.into();
    assert!(matches!(err, MosaicError::Service { status: 500 }));
    assert!(format!("{}", err).contains("500"));

    let err: MosaicError = FailureReason::Transport("timeout".to_string()).into();
    assert!(matches!(err, MosaicError::Transport(_)));

    let err: MosaicError = FailureReason::Decode(DecodeFailure { attempts: vec![] }).into();
    assert!(matches!(err, MosaicError::Decode(_)));
    assert!(format!("{}", err).contains("content not recognized as an image"));
}

/// IOエラーからの変換
#[test]
fn test_io_error_conversion() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let err: MosaicError = io_err.into();

    assert!(matches!(err, MosaicError::Io(_)));
    let display = format!("{}", err);
    assert!(display.contains("IO"));
}

/// JSONエラーからの変換
#[test]
fn test_json_error_conversion() {
    let json_err = serde_json::from_str::<serde_json::Value>("{ invalid }").unwrap_err();
    let err: MosaicError = json_err.into();

    assert!(matches!(err, MosaicError::JsonParse(_)));
}

/// common::Errorからの変換（透過的エラー）
#[test]
fn test_common_error_conversion() {
    let common_err = mosaic_art_common::Error::UnsupportedFormat("a.tiff".to_string());
    let err: MosaicError = common_err.into();

    assert!(matches!(err, MosaicError::Common(_)));
    assert!(format!("{}", err).contains("a.tiff"));
}
