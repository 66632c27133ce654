//! アップロード1回分の処理
//!
//! ラスタ版 → 解釈 → (成功時のみ) SVG版 の順に逐次実行する。
//! どこで失敗しても CycleOutcome の Failed として返し、エラーにはしない。

use crate::service::MosaicClient;
use mosaic_art_common::{
    interpret_response, CycleOutcome, DebugSnapshot, DecodedMosaic, FailureReason,
    ProcessingRequest, ProcessingResult, SourceImage,
};
use tracing::{debug, info, warn};

pub async fn run_cycle(client: &MosaicClient, source: SourceImage, fetch_svg: bool) -> CycleOutcome {
    let request = ProcessingRequest::from_source(&source);

    let response = match client.process(&request).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "サービスに接続できません");
            return CycleOutcome {
                source,
                snapshot: None,
                raw_body: None,
                result: ProcessingResult::Failed(FailureReason::Transport(e.to_string())),
            };
        }
    };

    let snapshot = DebugSnapshot::capture(response.status, &response.headers, &response.body);

    let result = if !response.is_success() {
        warn!(status = response.status, "サービスがエラーを返しました");
        ProcessingResult::Failed(FailureReason::Service {
            status: response.status,
        })
    } else {
        match interpret_response(&response.body, response.content_type()) {
            Ok(raster) => {
                info!(
                    format = ?raster.format,
                    path = ?raster.path,
                    width = raster.image.width(),
                    height = raster.image.height(),
                    "モザイク画像をデコード"
                );
                let svg = if fetch_svg {
                    client.fetch_svg(&request).await
                } else {
                    debug!("SVG取得は無効");
                    None
                };
                ProcessingResult::Decoded(DecodedMosaic { raster, svg })
            }
            Err(failure) => {
                warn!(attempts = %failure.summary(), "レスポンスを画像として解釈できません");
                ProcessingResult::Failed(FailureReason::Decode(failure))
            }
        }
    };

    CycleOutcome {
        source,
        snapshot: Some(snapshot),
        raw_body: Some(response.body),
        result,
    }
}
