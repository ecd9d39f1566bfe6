//! Resume screening engine.
//!
//! Scores candidate documents (PDF, DOCX, TXT) against locked job criteria:
//! text extraction with an OCR fallback, years-of-experience estimation, explainable
//! skill matching, JD similarity, and a final Selected / Rejected verdict. Documents whose
//! text cannot be extracted come back as `Pending`.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod extraction;
pub mod intake;
pub mod models;
pub mod pipeline;

pub use errors::ScreenError;
pub use extraction::{DocumentFormat, OcrConfig, TextExtractor};
pub use intake::{collect_inputs, CandidateFile, Intake, IntakeLimits};
pub use models::{
    Decision, ExtractedDocument, JobCriteria, ScoreRecord, ScreeningOutcome, ScreeningStatus,
};
pub use pipeline::{screen_batch, BatchReport, BatchSummary, ScreeningEngine};
