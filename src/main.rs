use chrono::Local;
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use mosaic_art::{cli, config, error, export, service, session, upload};
use mosaic_art_common::{
    build_downloads, report, CycleOutcome, DownloadKind, FailureReason, ProcessingResult, ResultView,
};
use cli::{Cli, Commands};
use config::Config;
use error::Result;
use service::MosaicClient;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load()?;

    match cli.command {
        Commands::Process { image, output, format, no_svg, debug, save_raw, report: report_path, service_url } => {
            println!("🎨 mosaic-art - モザイクアート生成\n");

            // 1. 画像読み込み
            println!("[1/3] 画像を読み込み中...");
            let source = upload::load_source_image(&image)?;
            println!("✔ {} ({} bytes)\n", source.file_name(), source.bytes().len());

            // 2. サービス呼び出し
            let base_url = service_url.unwrap_or_else(|| config.service_url());
            let client = MosaicClient::new(&base_url, config.timeout())?;

            println!("[2/3] サービスで処理中... ({})", client.endpoint());
            let spinner = ProgressBar::new_spinner();
            spinner.set_style(
                ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            spinner.set_message("Processing image... Please wait.");
            spinner.enable_steady_tick(Duration::from_millis(100));
            let outcome = session::run_cycle(&client, source, config.fetch_svg && !no_svg).await;
            spinner.finish_and_clear();

            // 成果物はすべて同じタイムスタンプ
            let timestamp = Local::now().naive_local();

            if debug {
                print_debug(&outcome);
            }

            if let Some(body) = &outcome.raw_body {
                if save_raw || (debug && confirm_save_raw()) {
                    match export::save_raw_response(body, &config.debug_dir, timestamp) {
                        Ok(path) => println!("✔ 生レスポンスを保存: {}", path.display()),
                        Err(e) => eprintln!("⚠ 生レスポンスの保存に失敗: {}", e),
                    }
                }
            }

            let downloads = match outcome.result.mosaic() {
                Some(mosaic) => build_downloads(mosaic, &format.kinds(), timestamp, config.jpeg_quality)?,
                None => Vec::new(),
            };

            if let Some(report_path) = &report_path {
                let html = report::render_html(&outcome, &downloads, debug)?;
                std::fs::write(report_path, html)?;
                println!("✔ レポート出力: {}", report_path.display());
            }

            let view = ResultView::from_outcome(Some(&outcome));
            if let ProcessingResult::Failed(reason) = outcome.result {
                return Err(reason.into());
            }

            if let (Some((ow, oh)), Some((pw, ph))) = (view.original_size, view.processed_size) {
                println!("✔ 処理完了: 元画像 {}x{} → モザイク {}x{}\n", ow, oh, pw, ph);
            }

            // 3. 保存
            println!("[3/3] 保存中...");
            let output_dir = output.unwrap_or_else(|| PathBuf::from("."));
            for path in export::save_downloads(&downloads, &output_dir)? {
                println!("✔ {}", path.display());
            }
            if format.kinds().contains(&DownloadKind::Svg) && !view.svg_enabled {
                println!("- SVG not available");
            }

            println!("\n✅ 完了");
        }

        Commands::Config { set_service_url, set_timeout, show } => {
            let mut config = config;

            if let Some(url) = set_service_url {
                config.set_service_url(url)?;
                println!("✔ サービスURLを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.set_timeout(seconds)?;
                println!("✔ タイムアウトを設定しました");
            }

            if show {
                println!("設定:");
                println!("  サービスURL: {}", config.service_url());
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!("  デバッグフォルダ: {}", config.debug_dir.display());
                println!("  JPEG品質: {}", config.jpeg_quality);
                println!("  SVG取得: {}", if config.fetch_svg { "有効" } else { "無効" });
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "mosaic_art=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_debug(outcome: &CycleOutcome) {
    println!("--- Debug Information ---");
    match &outcome.snapshot {
        Some(snapshot) => println!("{}", snapshot.render_text()),
        None => println!("(レスポンスなし)"),
    }
    if let ProcessingResult::Failed(FailureReason::Decode(failure)) = &outcome.result {
        println!("Decode attempts:");
        for attempt in &failure.attempts {
            println!("  {}", attempt);
        }
    }
    println!("-------------------------\n");
}

fn confirm_save_raw() -> bool {
    if !std::io::stdin().is_terminal() {
        return false;
    }
    dialoguer::Confirm::new()
        .with_prompt("生レスポンスをファイルに保存しますか?")
        .default(false)
        .interact()
        .unwrap_or(false)
}
