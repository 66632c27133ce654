//! デバッグ情報モジュール
//!
//! ラスタ呼び出しのレスポンスを表示用に記録する。
//! 記録した内容が処理の分岐に使われることはない。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 16進表示する先頭バイト数
pub const FIRST_BYTES_LEN: usize = 20;
/// テキストプレビューの最大文字数
pub const TEXT_PREVIEW_CHARS: usize = 500;

const NOT_SPECIFIED: &str = "Not specified";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugSnapshot {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub content_type: String,
    pub content_length: usize,
    pub first_bytes: String,
    pub text_preview: String,
}

impl DebugSnapshot {
    /// レスポンスから記録を作成
    ///
    /// 同名ヘッダーが複数ある場合は ", " で連結する。
    pub fn capture(status_code: u16, headers: &[(String, String)], body: &[u8]) -> Self {
        let mut header_map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            let key = name.to_ascii_lowercase();
            header_map
                .entry(key)
                .and_modify(|existing| {
                    existing.push_str(", ");
                    existing.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }

        let content_type = header_map
            .get("content-type")
            .filter(|v| !v.is_empty())
            .cloned()
            .unwrap_or_else(|| NOT_SPECIFIED.to_string());

        Self {
            status_code,
            headers: header_map,
            content_type,
            content_length: body.len(),
            first_bytes: first_bytes_hex(body),
            text_preview: text_preview(body),
        }
    }

    /// 端末・デスクトップ表示用のテキスト
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("Status Code: {}\n", self.status_code));
        out.push_str(&format!("Content Type: {}\n", self.content_type));
        out.push_str(&format!("Content Length: {} bytes\n", self.content_length));
        out.push_str(&format!("First Bytes (hex): {}\n", self.first_bytes));
        out.push_str("Headers:\n");
        for (name, value) in &self.headers {
            out.push_str(&format!("  {}: {}\n", name, value));
        }
        out.push_str("Content Preview:\n");
        out.push_str(&self.text_preview);
        out
    }
}

fn first_bytes_hex(body: &[u8]) -> String {
    if body.is_empty() {
        return "Empty".to_string();
    }
    body.iter()
        .take(FIRST_BYTES_LEN)
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(", ")
}

fn text_preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(TEXT_PREVIEW_CHARS)
        .collect()
}
