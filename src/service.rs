//! モザイク生成サービスとの通信
//!
//! - ラスタ版: `POST <base>/process-image/`
//! - SVG版: 同じフォームを `?format=svg` 付きで送る（失敗しても致命的ではない）

use crate::error::{MosaicError, Result};
use mosaic_art_common::ProcessingRequest;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, warn};

pub const PROCESS_PATH: &str = "process-image/";

/// サービスの生レスポンス
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Content-Type（なければ空文字）
    pub fn content_type(&self) -> &str {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("content-type"))
            .map(|(_, value)| value.as_str())
            .unwrap_or("")
    }

    pub fn is_success(&self) -> bool {
        self.status == 200
    }
}

/// `http://host:8000` → `http://host:8000/process-image/`
pub fn endpoint_url(base_url: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if base.ends_with(PROCESS_PATH.trim_end_matches('/')) {
        format!("{}/", base)
    } else {
        format!("{}/{}", base, PROCESS_PATH)
    }
}

pub struct MosaicClient {
    client: reqwest::Client,
    endpoint: String,
}

impl MosaicClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MosaicError::Config(format!("HTTPクライアント初期化エラー: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint_url(base_url),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn svg_endpoint(&self) -> String {
        format!("{}?format=svg", self.endpoint)
    }

    fn form(request: &ProcessingRequest) -> Result<Form> {
        let part = Part::bytes(request.bytes.clone())
            .file_name(request.file_name)
            .mime_str(request.media_type)?;
        Ok(Form::new().part(request.field_name, part))
    }

    /// ラスタ版をリクエスト
    ///
    /// ステータスコードは判定しない。通信が完了しなかった場合のみエラー。
    pub async fn process(&self, request: &ProcessingRequest) -> Result<RawResponse> {
        debug!(endpoint = %self.endpoint, bytes = request.bytes.len(), "ラスタ版をリクエスト");

        let response = self
            .client
            .post(&self.endpoint)
            .multipart(Self::form(request)?)
            .send()
            .await?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).to_string(),
                )
            })
            .collect();
        let body = response.bytes().await?.to_vec();

        debug!(status, length = body.len(), "ラスタ版レスポンス受信");

        Ok(RawResponse { status, headers, body })
    }

    /// SVG版をリクエスト
    ///
    /// 200以外・通信失敗はすべて「SVGなし」として None を返す。
    pub async fn fetch_svg(&self, request: &ProcessingRequest) -> Option<String> {
        let form = match Self::form(request) {
            Ok(form) => form,
            Err(e) => {
                warn!(error = %e, "SVGリクエストを作成できません");
                return None;
            }
        };

        match self.client.post(self.svg_endpoint()).multipart(form).send().await {
            Ok(response) if response.status().as_u16() == 200 => match response.text().await {
                Ok(text) => Some(text),
                Err(e) => {
                    warn!(error = %e, "SVG本文の読み込みに失敗");
                    None
                }
            },
            Ok(response) => {
                warn!(status = response.status().as_u16(), "SVG版は利用できません");
                None
            }
            Err(e) => {
                warn!(error = %e, "SVG版の取得に失敗");
                None
            }
        }
    }
}
