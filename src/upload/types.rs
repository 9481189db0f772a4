//! Upload verification errors.

use thiserror::Error;

/// Errors raised while verifying an uploaded file.
#[derive(Debug, Error)]
pub enum SignatureError {
    /// Caller input was malformed (empty extension, filename/extension mismatch).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The extension has no entry in the signature table.
    #[error("Unsupported extension: {0}")]
    UnsupportedExtension(String),

    /// The underlying stream failed for a reason other than end-of-file.
    #[error("Stream error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for upload verification.
pub type SignatureResult<T> = Result<T, SignatureError>;
