use crate::error::{MosaicError, Result};
use mosaic_art_common::encode::DEFAULT_JPEG_QUALITY;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// サービスURLを上書きする環境変数
pub const SERVICE_URL_ENV: &str = "MOSAIC_SERVICE_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// モザイク生成サービスのベースURL（`/process-image/` は付けない）
    pub service_url: String,
    pub timeout_seconds: u64,
    /// 生レスポンスの保存先
    pub debug_dir: PathBuf,
    pub jpeg_quality: u8,
    /// SVG版も取得するか
    pub fetch_svg: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_url: "http://13.48.67.116:8000".into(),
            timeout_seconds: 120,
            debug_dir: PathBuf::from("debug"),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            fetch_svg: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| MosaicError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("mosaic-art").join("config.json"))
    }

    /// 実際に使うサービスURL（環境変数を優先）
    pub fn service_url(&self) -> String {
        match std::env::var(SERVICE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => url,
            _ => self.service_url.clone(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn set_service_url(&mut self, url: String) -> Result<()> {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(MosaicError::Config(format!(
                "URLは http:// または https:// で始めてください: {}",
                url
            )));
        }
        self.service_url = url;
        self.save()
    }

    pub fn set_timeout(&mut self, seconds: u64) -> Result<()> {
        if seconds == 0 {
            return Err(MosaicError::Config("タイムアウトは1秒以上にしてください".into()));
        }
        self.timeout_seconds = seconds;
        self.save()
    }
}
