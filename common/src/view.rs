//! 表示状態モジュール
//!
//! UIが「いま何を見せるか」を CycleOutcome から導出する。
//! 現在の結果は Session が1つだけ保持し、新しいアップロードで丸ごと置き換える。

use crate::types::{CycleOutcome, ProcessingResult};

/// アップロード1回の状態遷移
///
/// `Idle -> Submitted -> {Decoded | Failed} -> Submitted (次のアップロード)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleState {
    Idle,
    Submitted,
    Decoded,
    Failed,
}

/// 送信時に払い出す番号。古い番号の完了は捨てられる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// 現在の結果の持ち主
#[derive(Debug, Default)]
pub struct Session {
    generation: u64,
    submitted: bool,
    current: Option<CycleOutcome>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新しいアップロードを開始。前回の結果はこの時点で無効になる。
    pub fn submit(&mut self) -> Ticket {
        self.generation += 1;
        self.submitted = true;
        self.current = None;
        Ticket(self.generation)
    }

    /// 結果を反映。最新の番号でなければ捨てて false を返す。
    pub fn complete(&mut self, ticket: Ticket, outcome: CycleOutcome) -> bool {
        if ticket.0 != self.generation {
            return false;
        }
        self.submitted = false;
        self.current = Some(outcome);
        true
    }

    pub fn current(&self) -> Option<&CycleOutcome> {
        self.current.as_ref()
    }

    pub fn state(&self) -> CycleState {
        if self.submitted {
            return CycleState::Submitted;
        }
        match &self.current {
            None => CycleState::Idle,
            Some(outcome) => match outcome.result {
                ProcessingResult::Decoded(_) => CycleState::Decoded,
                ProcessingResult::Failed(_) => CycleState::Failed,
            },
        }
    }

    pub fn view(&self) -> ResultView {
        match self.state() {
            CycleState::Submitted => ResultView::submitted(),
            _ => ResultView::from_outcome(self.current()),
        }
    }
}

/// UIに渡す表示内容
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub state: CycleState,
    /// エラーメッセージ（失敗時のみ）
    pub message: Option<String>,
    pub show_images: bool,
    pub original_size: Option<(u32, u32)>,
    pub processed_size: Option<(u32, u32)>,
    pub png_enabled: bool,
    pub jpg_enabled: bool,
    pub svg_enabled: bool,
}

impl ResultView {
    pub fn idle() -> Self {
        Self {
            state: CycleState::Idle,
            message: None,
            show_images: false,
            original_size: None,
            processed_size: None,
            png_enabled: false,
            jpg_enabled: false,
            svg_enabled: false,
        }
    }

    pub fn submitted() -> Self {
        Self {
            state: CycleState::Submitted,
            ..Self::idle()
        }
    }

    pub fn from_outcome(outcome: Option<&CycleOutcome>) -> Self {
        let Some(outcome) = outcome else {
            return Self::idle();
        };

        match &outcome.result {
            ProcessingResult::Decoded(mosaic) => Self {
                state: CycleState::Decoded,
                message: None,
                show_images: true,
                original_size: outcome.source.dimensions(),
                processed_size: Some(mosaic.raster.dimensions()),
                png_enabled: true,
                jpg_enabled: true,
                svg_enabled: mosaic.svg.is_some(),
            },
            ProcessingResult::Failed(reason) => Self {
                state: CycleState::Failed,
                message: Some(reason.to_string()),
                ..Self::idle()
            },
        }
    }
}
