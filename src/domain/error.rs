// ============================================================
// Layer 3 — Pipeline Error Taxonomy
// ============================================================
// Every failure in the pipeline falls into one of three kinds:
//
//   Data  — the input file is missing or malformed, or the
//           stratified split cannot be satisfied
//   Model — a batch does not fit the model's shape contract
//   Io    — an output artifact cannot be written, or the model
//           file is missing when the report is generated
//
// Lower layers return Result<T, PipelineError>. The application
// layer wraps these in anyhow with extra context, so the CLI
// prints the whole chain before exiting with a non-zero status.
//
// Reference: Rust Book §9 (Recoverable Errors with Result)

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineError {
    Data(String),
    Model(String),
    Io(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl PipelineError {
    pub fn data(msg: impl Into<String>) -> Self {
        PipelineError::Data(msg.into())
    }

    pub fn model(msg: impl Into<String>) -> Self {
        PipelineError::Model(msg.into())
    }

    pub fn io(msg: impl Into<String>) -> Self {
        PipelineError::Io(msg.into())
    }
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Data(msg)  => write!(f, "data error: {msg}"),
            PipelineError::Model(msg) => write!(f, "model error: {msg}"),
            PipelineError::Io(msg)    => write!(f, "io error: {msg}"),
        }
    }
}

impl std::error::Error for PipelineError {}
