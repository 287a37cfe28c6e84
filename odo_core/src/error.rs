use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReconstructError {
    #[error("insufficient data: need at least {needed} samples, got {got}")]
    InsufficientData { got: usize, needed: usize },
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),
}

/// Failures at a collaborator boundary during a polling cycle.
#[derive(Debug, Error, Clone)]
pub enum PipelineError {
    #[error("sample source error: {0}")]
    Source(String),
    #[error("event source error: {0}")]
    Events(String),
    #[error("donation feed error: {0}")]
    Feed(String),
    #[error("artifact sink error: {0}")]
    Sink(String),
    #[error("serialize {name}: {message}")]
    Serialize { name: String, message: String },
}

pub type Result<T> = eyre::Result<T>;
pub use eyre::Report;
