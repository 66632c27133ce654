//! HTMLレポートモジュール
//!
//! 元画像と処理後画像を左右に並べ、ダウンロードリンクを `data:` URLで埋め込んだ
//! 単一HTMLを生成する。デバッグ指定時はレスポンス情報も載せる。

use crate::download::{DownloadArtifact, DownloadKind};
use crate::encode::encode_png;
use crate::error::Result;
use crate::types::{CycleOutcome, FailureReason, ProcessingResult};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

const STYLE: &str = r#"
body { font-family: sans-serif; margin: 2rem; background: #ffffff; color: #222222; }
.main-header { font-size: 2.5rem; font-weight: bold; text-align: center; margin-bottom: 1rem; }
.sub-header { font-size: 1.5rem; font-weight: bold; margin: 1rem 0 0.5rem; }
.columns { display: flex; gap: 1rem; }
.image-container { flex: 1; border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 1rem; }
.image-container img { width: 100%; }
.download-btn { display: block; padding: 10px; margin-bottom: 0.5rem; border-radius: 5px;
  background: #007bff; color: white; text-align: center; text-decoration: none; }
.download-btn.disabled { background: #999999; cursor: not-allowed; }
.error-box { padding: 1rem; border-radius: 0.5rem; background: #fdecea; border: 1px solid #f5c2c7; }
.debug-box { background: #f1f1f1; border: 1px solid #dee2e6; border-radius: 0.5rem; padding: 1rem; overflow-x: auto; }
@media (prefers-color-scheme: dark) {
  body { background: #121212; color: #f1f1f1; }
  .image-container { border-color: #444444; background: #2d2d2d; }
  .debug-box { background: #2d2d2d; color: #e0e0e0; border-color: #444444; }
}
"#;

/// レポートHTMLを生成
pub fn render_html(outcome: &CycleOutcome, downloads: &[DownloadArtifact], show_debug: bool) -> Result<String> {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str("<title>Mosaic Art Image Processor</title>\n");
    html.push_str(&format!("<style>{}</style>\n</head>\n<body>\n", STYLE));
    html.push_str("<div class='main-header'>Mosaic Art Image Processor</div>\n");

    match &outcome.result {
        ProcessingResult::Decoded(mosaic) => {
            let original_url = format!(
                "data:{};base64,{}",
                outcome.source.media_type(),
                STANDARD.encode(outcome.source.bytes())
            );
            let processed_url = format!(
                "data:image/png;base64,{}",
                STANDARD.encode(encode_png(&mosaic.raster.image)?)
            );

            html.push_str("<div class='sub-header'>Results</div>\n<div class='columns'>\n");
            html.push_str(&image_column("Original Image", &original_url));
            html.push_str(&image_column("Processed Image", &processed_url));
            html.push_str("</div>\n");

            html.push_str("<div class='sub-header'>Download Options</div>\n<div class='columns'>\n");
            for kind in DownloadKind::ALL {
                html.push_str("<div class='image-container'>");
                match downloads.iter().find(|d| d.kind == kind) {
                    Some(artifact) => html.push_str(&format!(
                        "<a href=\"{}\" download=\"{}\" class=\"download-btn\">{}</a>",
                        artifact.to_data_url(),
                        escape(&artifact.file_name),
                        kind.label()
                    )),
                    None => html.push_str(&format!(
                        "<span class=\"download-btn disabled\">{} not available</span>",
                        kind.extension().to_uppercase()
                    )),
                }
                html.push_str("</div>\n");
            }
            html.push_str("</div>\n");
        }
        ProcessingResult::Failed(reason) => {
            html.push_str(&format!("<div class='error-box'>{}</div>\n", escape(&reason.to_string())));
        }
    }

    if show_debug {
        if let Some(snapshot) = &outcome.snapshot {
            html.push_str("<div class='sub-header'>Debug Information</div>\n");
            html.push_str(&format!(
                "<div class='debug-box'><pre>{}</pre></div>\n",
                escape(&snapshot.render_text())
            ));
        }
        if let ProcessingResult::Failed(FailureReason::Decode(failure)) = &outcome.result {
            html.push_str(&format!(
                "<div class='debug-box'><p><strong>Decode attempts:</strong></p><pre>{}</pre></div>\n",
                escape(&failure.summary())
            ));
        }
    }

    html.push_str("</body>\n</html>\n");
    Ok(html)
}

fn image_column(title: &str, src: &str) -> String {
    format!(
        "<div class='image-container'><h3 style='text-align: center;'>{}</h3><img src=\"{}\"></div>\n",
        title, src
    )
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
