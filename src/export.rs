//! ダウンロード成果物・生レスポンスのファイル保存

use crate::error::Result;
use mosaic_art_common::download::raw_response_file_name;
use mosaic_art_common::DownloadArtifact;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 成果物を出力ディレクトリへ書き出す
pub fn save_downloads(artifacts: &[DownloadArtifact], output_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(output_dir)?;

    let mut paths = Vec::new();
    for artifact in artifacts {
        let path = output_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.bytes)?;
        debug!(path = %path.display(), bytes = artifact.bytes.len(), "保存");
        paths.push(path);
    }

    Ok(paths)
}

/// 生レスポンスをデバッグディレクトリへ保存
pub fn save_raw_response(body: &[u8], debug_dir: &Path, timestamp: NaiveDateTime) -> Result<PathBuf> {
    std::fs::create_dir_all(debug_dir)?;
    let path = debug_dir.join(raw_response_file_name(timestamp));
    std::fs::write(&path, body)?;
    Ok(path)
}
