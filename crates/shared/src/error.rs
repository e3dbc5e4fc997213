use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No handler answered the message.
    Unavailable,
    /// A payload could not be encoded or decoded.
    Malformed,
}

/// Failure of a request sent across the host message boundary.
#[derive(Debug, Error)]
#[error("{code:?}: {message}")]
pub struct HostException {
    pub code: ErrorCode,
    pub message: String,
}

impl HostException {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exception_message_names_code() {
        let err = HostException::new(ErrorCode::Malformed, "decode page status");
        assert_eq!(err.to_string(), "Malformed: decode page status");
    }
}
