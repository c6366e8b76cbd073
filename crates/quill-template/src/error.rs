use thiserror::Error;

/// Result type for template codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from decoding a document resource.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    #[error("unsupported document encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("malformed {scheme} payload: {reason}")]
    MalformedPayload {
        scheme: &'static str,
        reason: String,
    },
}
