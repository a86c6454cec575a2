use thiserror::Error;

/// Why a submission ended in the `error` status.
///
/// The UI treats every variant the same way (one generic banner); the
/// distinction only matters for logging.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("endpoint rejected the submission with status {status}")]
    Rejected { status: u16 },
    #[error("request failed: {0}")]
    Transport(String),
    #[error("could not encode form body: {0}")]
    Encode(#[from] serde_json::Error),
}

pub type SubmitResult = Result<(), SubmitError>;
