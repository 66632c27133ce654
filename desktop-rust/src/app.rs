use std::sync::mpsc::{self, Receiver, Sender};

use eframe::egui::{self, Color32, RichText};
use eframe::egui::{FontData, FontDefinitions, FontFamily};
use image::DynamicImage;
use tracing::{info, warn};

use crate::io::{load_upload, save_artifact, save_raw};
use crate::model::AppState;
use mosaic_art::config::Config;
use mosaic_art::service::MosaicClient;
use mosaic_art::session::run_cycle;
use mosaic_art_common::{
    build_downloads, CycleOutcome, CycleState, DownloadKind, FailureReason, ProcessingResult,
    ResultView, SourceImage, Ticket,
};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

pub struct DesktopApp {
    state: AppState,
    config: Config,
    cycle_rx: Receiver<UiMessage>,
    cycle_tx: Sender<UiMessage>,
    original_texture: Option<egui::TextureHandle>,
    processed_texture: Option<egui::TextureHandle>,
}

enum UiMessage {
    CycleDone { ticket: Ticket, outcome: CycleOutcome },
}

impl DesktopApp {
    fn open_image(&mut self) {
        let Some(path) = rfd::FileDialog::new()
            .add_filter("Image", IMAGE_EXTENSIONS)
            .pick_file()
        else {
            return;
        };

        match load_upload(&path) {
            Ok(source) => self.submit(source),
            Err(err) => self.state.status = format!("Load failed: {err:#}"),
        }
    }

    /// 新しいアップロードを開始。前回の結果・テクスチャ・ダウンロードは破棄する。
    fn submit(&mut self, source: SourceImage) {
        let ticket = self.state.session.submit();
        self.state.downloads.clear();
        self.state.timestamp = None;
        self.original_texture = None;
        self.processed_texture = None;
        self.state.status = format!("Processing {}...", source.file_name());

        let base_url = self.config.service_url();
        let timeout = self.config.timeout();
        let fetch_svg = self.config.fetch_svg;
        let sender = self.cycle_tx.clone();

        std::thread::spawn(move || {
            let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime,
                Err(err) => {
                    warn!(error = %err, "tokio runtime could not be created");
                    let _ = sender.send(UiMessage::CycleDone {
                        ticket,
                        outcome: failed_outcome(source, err.to_string()),
                    });
                    return;
                }
            };

            let outcome = runtime.block_on(async move {
                match MosaicClient::new(&base_url, timeout) {
                    Ok(client) => run_cycle(&client, source, fetch_svg).await,
                    Err(err) => failed_outcome(source, err.to_string()),
                }
            });
            let _ = sender.send(UiMessage::CycleDone { ticket, outcome });
        });
    }

    fn poll_messages(&mut self, ctx: &egui::Context) {
        while let Ok(msg) = self.cycle_rx.try_recv() {
            let UiMessage::CycleDone { ticket, outcome } = msg;
            if !self.state.session.complete(ticket, outcome) {
                info!("stale result discarded");
                continue;
            }

            // テクスチャとダウンロードは受理した結果についてだけ一度作る
            let timestamp = chrono::Local::now().naive_local();
            let mut status = match self.state.session.state() {
                CycleState::Decoded => "Processing complete".to_string(),
                _ => String::new(),
            };
            let mut downloads = Vec::new();
            if let Some(current) = self.state.session.current() {
                self.original_texture = image::load_from_memory(current.source.bytes())
                    .ok()
                    .map(|img| load_texture(ctx, "original", &img));
                self.processed_texture = None;
                if let Some(mosaic) = current.result.mosaic() {
                    self.processed_texture = Some(load_texture(ctx, "processed", &mosaic.raster.image));
                    match build_downloads(mosaic, &DownloadKind::ALL, timestamp, self.config.jpeg_quality) {
                        Ok(built) => downloads = built,
                        Err(err) => status = format!("Encode failed: {err}"),
                    }
                }
            }
            self.state.downloads = downloads;
            self.state.timestamp = Some(timestamp);
            self.state.status = status;
        }
    }

    fn save_download(&mut self, kind: DownloadKind) {
        let Some(artifact) = self.state.download(kind) else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .set_file_name(artifact.file_name.as_str())
            .add_filter(kind.extension(), &[kind.extension()])
            .save_file()
        else {
            return;
        };

        self.state.status = match save_artifact(&path, artifact) {
            Ok(_) => format!("Saved {}", path.display()),
            Err(err) => format!("Save failed: {err:#}"),
        };
    }

    fn save_raw_response(&mut self) {
        let Some(body) = self.state.session.current().and_then(|o| o.raw_body.as_ref()) else {
            return;
        };
        let timestamp = self
            .state
            .timestamp
            .unwrap_or_else(|| chrono::Local::now().naive_local());

        self.state.status = match save_raw(body, &self.config.debug_dir, timestamp) {
            Ok(path) => format!("Raw response saved to {}", path.display()),
            Err(err) => format!("Error saving response: {err:#}"),
        };
    }

    fn render_results(&mut self, ui: &mut egui::Ui, view: &ResultView) {
        ui.heading("Results");
        ui.columns(2, |columns| {
            columns[0].vertical_centered(|ui| {
                ui.label(RichText::new("Original Image").strong());
                show_texture(ui, self.original_texture.as_ref());
            });
            columns[1].vertical_centered(|ui| {
                ui.label(RichText::new("Processed Image").strong());
                show_texture(ui, self.processed_texture.as_ref());
            });
        });

        ui.separator();
        ui.heading("Download Options");
        ui.horizontal(|ui| {
            if ui.add_enabled(view.png_enabled, egui::Button::new(DownloadKind::Png.label())).clicked() {
                self.save_download(DownloadKind::Png);
            }
            if ui.add_enabled(view.jpg_enabled, egui::Button::new(DownloadKind::Jpg.label())).clicked() {
                self.save_download(DownloadKind::Jpg);
            }
            let svg_label = if view.svg_enabled { DownloadKind::Svg.label() } else { "SVG not available" };
            if ui.add_enabled(view.svg_enabled, egui::Button::new(svg_label)).clicked() {
                self.save_download(DownloadKind::Svg);
            }
        });
    }

    fn render_debug(&mut self, ui: &mut egui::Ui) {
        let Some(outcome) = self.state.session.current() else {
            return;
        };
        let Some(snapshot) = &outcome.snapshot else {
            return;
        };
        let text = snapshot.render_text();
        let attempts = match &outcome.result {
            ProcessingResult::Failed(FailureReason::Decode(failure)) => Some(failure.summary()),
            _ => None,
        };
        let has_body = outcome.raw_body.is_some();

        ui.separator();
        ui.heading("Debug Information");
        egui::CollapsingHeader::new("API Response Details")
            .default_open(true)
            .show(ui, |ui| {
                ui.monospace(text);
                if let Some(attempts) = attempts {
                    ui.label(RichText::new("Decode attempts").strong());
                    ui.monospace(attempts);
                }
                if ui.add_enabled(has_body, egui::Button::new("Save Raw Response to File")).clicked() {
                    self.save_raw_response();
                }
            });
    }
}

fn failed_outcome(source: SourceImage, message: String) -> CycleOutcome {
    CycleOutcome {
        source,
        snapshot: None,
        raw_body: None,
        result: ProcessingResult::Failed(FailureReason::Transport(message)),
    }
}

fn load_texture(ctx: &egui::Context, name: &str, image: &DynamicImage) -> egui::TextureHandle {
    let rgba = image.to_rgba8();
    let size = [rgba.width() as usize, rgba.height() as usize];
    let color_image = egui::ColorImage::from_rgba_unmultiplied(size, rgba.as_raw());
    ctx.load_texture(name, color_image, egui::TextureOptions::default())
}

/// 列幅に合わせて縦横比を保ったまま表示
fn show_texture(ui: &mut egui::Ui, texture: Option<&egui::TextureHandle>) {
    let Some(texture) = texture else {
        ui.label("No image");
        return;
    };
    let [w, h] = texture.size();
    let max_width = ui.available_width().max(1.0);
    let scale = max_width / w.max(1) as f32;
    let size = egui::vec2(max_width, h as f32 * scale);
    ui.add(egui::Image::new(texture).fit_to_exact_size(size));
}

pub fn configure_fonts(ctx: &egui::Context) {
    let mut fonts = FontDefinitions::default();
    let candidates = [
        r"C:\Windows\Fonts\meiryo.ttc",
        r"C:\Windows\Fonts\msgothic.ttc",
        "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
        "/usr/share/fonts/truetype/noto/NotoSansCJK-Regular.ttc",
        "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    ];

    for path in candidates {
        if let Ok(data) = std::fs::read(path) {
            fonts.font_data.insert("jp_fallback".to_string(), FontData::from_owned(data));
            fonts.families
                .entry(FontFamily::Proportional)
                .or_default()
                .push("jp_fallback".to_string());
            fonts.families
                .entry(FontFamily::Monospace)
                .or_default()
                .push("jp_fallback".to_string());
            ctx.set_fonts(fonts);
            return;
        }
    }
}

impl Default for DesktopApp {
    fn default() -> Self {
        let (cycle_tx, cycle_rx) = mpsc::channel();
        let mut state = AppState::default();
        let config = match Config::load() {
            Ok(config) => config,
            Err(err) => {
                state.status = format!("Config load failed, using defaults: {err}");
                Config::default()
            }
        };
        Self {
            state,
            config,
            cycle_rx,
            cycle_tx,
            original_texture: None,
            processed_texture: None,
        }
    }
}

impl eframe::App for DesktopApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll_messages(ctx);
        let view = self.state.session.view();
        if view.state == CycleState::Submitted {
            ctx.request_repaint();
        }

        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.heading("Mosaic Art Image Processor");
                ui.separator();
                if ui
                    .add_enabled(view.state != CycleState::Submitted, egui::Button::new("Upload Image"))
                    .clicked()
                {
                    self.open_image();
                }
                if !self.state.status.is_empty() {
                    ui.label(RichText::new(&self.state.status).color(Color32::from_gray(170)));
                }
            });
        });

        egui::SidePanel::left("options").resizable(false).show(ctx, |ui| {
            ui.checkbox(&mut self.state.show_debug, "Show Debug Information");
            ui.separator();
            ui.label("Supported formats: JPG, PNG, JPEG.");
            ui.label(RichText::new(self.config.service_url()).color(Color32::from_gray(140)).small());
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical().show(ui, |ui| {
                match view.state {
                    CycleState::Idle => {
                        ui.label("Upload an image to create mosaic art.");
                    }
                    CycleState::Submitted => {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label("Processing image... Please wait.");
                        });
                    }
                    CycleState::Failed => {
                        if let Some(message) = &view.message {
                            ui.label(RichText::new(message).color(Color32::from_rgb(220, 80, 80)));
                        }
                    }
                    CycleState::Decoded => self.render_results(ui, &view),
                }

                if self.state.show_debug {
                    self.render_debug(ui);
                }
            });
        });
    }
}
