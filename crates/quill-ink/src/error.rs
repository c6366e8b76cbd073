use thiserror::Error;

/// Result type for ink operations.
pub type InkResult<T> = Result<T, InkError>;

/// Errors from ink capture and encoding.
#[derive(Debug, Error)]
pub enum InkError {
    #[error("invalid surface dimensions: {width}x{height}")]
    InvalidSurface { width: u32, height: u32 },

    #[error("invalid stroke width: {0}")]
    InvalidStrokeWidth(f32),

    #[error("ink colour is fully transparent")]
    InvisibleInk,

    #[error("failed to encode surface: {0}")]
    Encode(String),
}

impl From<image::ImageError> for InkError {
    fn from(err: image::ImageError) -> Self {
        InkError::Encode(err.to_string())
    }
}
