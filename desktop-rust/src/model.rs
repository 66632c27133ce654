use chrono::NaiveDateTime;
use mosaic_art_common::{DownloadArtifact, Session};

#[derive(Debug, Default)]
pub struct AppState {
    pub session: Session,
    /// 現在の結果から作ったダウンロード（結果と一緒に丸ごと置き換える）
    pub downloads: Vec<DownloadArtifact>,
    pub timestamp: Option<NaiveDateTime>,
    pub show_debug: bool,
    pub status: String,
}

impl AppState {
    pub fn download(&self, kind: mosaic_art_common::DownloadKind) -> Option<&DownloadArtifact> {
        self.downloads.iter().find(|d| d.kind == kind)
    }
}
