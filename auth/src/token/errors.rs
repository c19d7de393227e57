use thiserror::Error;

/// Error type for token operations.
///
/// Callers at the HTTP edge collapse every verification variant into a
/// single unauthorized response; the variants exist for logging and tests.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token payload is malformed: {0}")]
    MalformedPayload(String),

    #[error("Token is malformed: {0}")]
    MalformedToken(String),
}
