use crate::client::SubmissionError;
use crate::validator::ValidationError;
use thiserror::Error;

/// Any failure that ends a request cycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error("Request cancelled")]
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("A prediction is already being analyzed; wait for it to finish")]
    ConcurrentSubmission,
}
