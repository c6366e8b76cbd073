use quill_ink::InkError;
use quill_types::{ArtifactRole, RequestId, RequestStatus};
use thiserror::Error;

/// Result type for signing operations.
pub type SigningResult<T> = Result<T, SigningError>;

/// Errors from the signing lifecycle.
#[derive(Debug, Error)]
pub enum SigningError {
    #[error("signing request {id} is {status}, not pending")]
    RequestNotPending {
        id: RequestId,
        status: RequestStatus,
    },

    #[error("{0} has no ink")]
    InsufficientInk(ArtifactRole),

    #[error("legal consent not given")]
    ConsentMissing,

    #[error("submission already in flight for request {0}")]
    SubmissionInFlight(RequestId),

    #[error("submission rejected: {message}")]
    SubmissionRejected { message: String },

    #[error("signing request not found: {0}")]
    RequestNotFound(RequestId),

    #[error("store error: {0}")]
    Store(String),

    #[error("ink capture error: {0}")]
    Ink(#[from] InkError),
}

impl SigningError {
    /// Message suitable for showing to the person signing.
    pub fn user_message(&self) -> String {
        match self {
            SigningError::RequestNotPending {
                status: RequestStatus::Signed,
                ..
            } => "This document has already been signed.".to_string(),
            SigningError::RequestNotPending {
                status: RequestStatus::Expired,
                ..
            } => "This signing request has expired.".to_string(),
            SigningError::RequestNotPending { .. } => {
                "This signing request can no longer be signed.".to_string()
            }
            SigningError::InsufficientInk(ArtifactRole::Signature) => {
                "Please draw your signature.".to_string()
            }
            SigningError::InsufficientInk(ArtifactRole::Initials) => {
                "Please draw your initials.".to_string()
            }
            SigningError::ConsentMissing => {
                "Please agree to sign this document electronically.".to_string()
            }
            SigningError::SubmissionInFlight(_) => {
                "Your signature is already being submitted.".to_string()
            }
            SigningError::SubmissionRejected { message } => message.clone(),
            SigningError::RequestNotFound(_) => "Signing request not found.".to_string(),
            SigningError::Store(_) | SigningError::Ink(_) => {
                "Something went wrong. Please try again.".to_string()
            }
        }
    }

    /// Whether the user can retry without redrawing.
    pub fn is_retryable(&self) -> bool {
        matches!(self, SigningError::SubmissionRejected { .. })
    }

    /// Whether the request can never be signed through this engine again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SigningError::RequestNotPending { .. })
    }
}
