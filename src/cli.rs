use clap::{Parser, Subcommand};
use mosaic_art_common::DownloadKind;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mosaic-art")]
#[command(about = "モザイクアート画像処理クライアント", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像をサービスへ送り、モザイクアートを保存
    Process {
        /// 入力画像（JPG/JPEG/PNG）
        #[arg(required = true)]
        image: PathBuf,

        /// 出力ディレクトリ（デフォルト: カレント）
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 保存形式 (png/jpg/svg/all)
        #[arg(short, long, default_value = "all")]
        format: DownloadFormat,

        /// SVG版を取得しない
        #[arg(long)]
        no_svg: bool,

        /// レスポンスのデバッグ情報を表示
        #[arg(long)]
        debug: bool,

        /// 生レスポンスをデバッグフォルダへ保存
        #[arg(long)]
        save_raw: bool,

        /// 結果をHTMLレポートとして出力
        #[arg(long)]
        report: Option<PathBuf>,

        /// サービスURL（設定・環境変数より優先）
        #[arg(long)]
        service_url: Option<String>,
    },

    /// 設定を表示/編集
    Config {
        /// サービスURLを設定
        #[arg(long)]
        set_service_url: Option<String>,

        /// タイムアウト（秒）を設定
        #[arg(long)]
        set_timeout: Option<u64>,

        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum DownloadFormat {
    Png,
    Jpg,
    Svg,
    #[default]
    All,
}

impl DownloadFormat {
    pub fn kinds(&self) -> Vec<DownloadKind> {
        match self {
            DownloadFormat::Png => vec![DownloadKind::Png],
            DownloadFormat::Jpg => vec![DownloadKind::Jpg],
            DownloadFormat::Svg => vec![DownloadKind::Svg],
            DownloadFormat::All => DownloadKind::ALL.to_vec(),
        }
    }
}

impl std::str::FromStr for DownloadFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(DownloadFormat::Png),
            "jpg" | "jpeg" => Ok(DownloadFormat::Jpg),
            "svg" => Ok(DownloadFormat::Svg),
            "all" => Ok(DownloadFormat::All),
            _ => Err(format!("Unknown format: {}. Use png, jpg, svg, or all", s)),
        }
    }
}
