use thiserror::Error;

/// Errors produced by the detection pipeline and its collaborators.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A structuring-element name that is not one of the known variants.
    #[error("invalid kernel variant: {0:?}")]
    InvalidKernelVariant(String),

    /// A background-subtraction algorithm name outside the supported family.
    #[error("unknown background subtraction algorithm: {0:?} (expected one of GMG, MOG, MOG2, KNN, CNT)")]
    InvalidAlgorithm(String),

    /// A pipeline configuration that cannot produce meaningful output.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// A mid-stream decode failure, distinct from normal end of stream.
    #[error("failed to read frame from source: {0}")]
    SourceRead(String),
}
