use std::path::Path;

use thiserror::Error;

pub mod clean;
pub mod comment;
pub mod config_file;
pub mod extract;
pub mod screener;

// Re-export for convenience
pub use clean::clean_text;
pub use comment::synthesize_comment;
pub use extract::{ExtractError, extract_text};
pub use screener::{ScreenOutcome, screen_files};

/// An uploaded resume: a binary blob plus the name it arrived under.
///
/// Lives only for the duration of one batch; nothing is persisted.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub name: String,
    pub data: Vec<u8>,
}

impl ResumeFile {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }
}

/// Per-file screening result. Immutable once created.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ScreeningRecord {
    pub file: String,
    pub predicted_class: usize,
    pub relevance_prob: f64,
    pub comment: String,
}

/// Summary statistics for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScreenStats {
    pub total: usize,
    pub screened: usize,
    pub recommended: usize,
    pub not_recommended: usize,
    /// Files whose cleaned text was empty (nothing to classify).
    pub empty: usize,
    /// Files that failed extraction or classification.
    pub failed: usize,
}

/// Progress events emitted while a batch runs.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    Extracting {
        index: usize,
        total: usize,
        file: String,
    },
    Record {
        index: usize,
        total: usize,
        record: Box<ScreeningRecord>,
    },
    Warning {
        index: usize,
        total: usize,
        file: String,
        message: String,
    },
    Failed {
        index: usize,
        total: usize,
        file: String,
        message: String,
    },
}

/// Errors from a PDF extraction backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("failed to open document: {0}")]
    Open(String),
    #[error("text extraction failed: {0}")]
    Extraction(String),
}

/// Text extraction seam. The mupdf implementation lives in
/// `cvscreen-pdf-mupdf` so that this crate stays free of the AGPL
/// dependency; tests substitute their own backends.
pub trait PdfBackend {
    /// Extract the concatenated text of all pages of the document at `path`.
    fn extract_text(&self, path: &Path) -> Result<String, BackendError>;
}

/// Errors from a classification pipeline.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("prediction failed: {0}")]
    Prediction(String),
}

/// A pre-trained text classification pipeline.
///
/// The interface is batched because the underlying models are; the
/// orchestrator wraps each file's text in a one-element batch. The pipeline
/// is loaded once per process and treated as read-only, so `&self` suffices.
pub trait ClassifierPipeline {
    /// Predicted class label per input text.
    fn predict(&self, texts: &[String]) -> Result<Vec<usize>, PipelineError>;

    /// Class-probability vector per input text, columns in the pipeline's
    /// class order.
    fn predict_proba(&self, texts: &[String]) -> Result<Vec<Vec<f64>>, PipelineError>;
}
