use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use mosaic_art::export::save_raw_response;
use mosaic_art::upload::load_source_image;
use mosaic_art_common::{DownloadArtifact, SourceImage};
use std::fs;
use std::path::{Path, PathBuf};

pub fn load_upload(path: &Path) -> Result<SourceImage> {
    load_source_image(path).with_context(|| format!("load {}", path.display()))
}

pub fn save_artifact(path: &Path, artifact: &DownloadArtifact) -> Result<()> {
    fs::write(path, &artifact.bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn save_raw(body: &[u8], debug_dir: &Path, timestamp: NaiveDateTime) -> Result<PathBuf> {
    save_raw_response(body, debug_dir, timestamp)
        .with_context(|| format!("write raw response to {}", debug_dir.display()))
}
