//! Mosaic Art Common Library
//!
//! CLIとデスクトップUIで共有される型と純粋ロジック（I/Oなし）

pub mod types;
pub mod error;
pub mod interpreter;
pub mod debug;
pub mod encode;
pub mod download;
pub mod view;
pub mod report;

pub use types::{
    CycleOutcome, DecodedMosaic, FailureReason, ProcessingRequest, ProcessingResult, SourceImage,
};
pub use error::{Error, Result};
pub use interpreter::{interpret_response, DecodeFailure, DecodePath, DecodedRaster};
pub use debug::DebugSnapshot;
pub use download::{build_downloads, DownloadArtifact, DownloadKind};
pub use view::{CycleState, ResultView, Session, Ticket};
