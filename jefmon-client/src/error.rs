//! Error types for the instance client

use jefmon_core::domain::state::ParseStateError;
use jefmon_core::dto::suites::SuitesDecodeError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when querying a monitor instance
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (connection refused, timeout, invalid URL...)
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Instance returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message from the instance
        message: String,
    },

    /// Instance answered successfully but without a body
    #[error("Instance returned no content")]
    NoContent,

    /// Body is not a valid `suites/json` document
    #[error("Failed to parse response: {0}")]
    ParseError(String),
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    /// Check if the instance answered with an empty body
    pub fn is_no_content(&self) -> bool {
        matches!(self, Self::NoContent)
    }

    /// Check if the instance answered with a body we could not decode
    pub fn is_bad_format(&self) -> bool {
        matches!(self, Self::ParseError(_))
    }

    /// Check if the request timed out
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestFailed(e) if e.is_timeout())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError(format!("invalid suites JSON: {}", err))
    }
}

impl From<ParseStateError> for ClientError {
    fn from(err: ParseStateError) -> Self {
        Self::ParseError(err.to_string())
    }
}

impl From<SuitesDecodeError> for ClientError {
    fn from(err: SuitesDecodeError) -> Self {
        Self::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_helpers() {
        assert!(ClientError::NoContent.is_no_content());
        assert!(!ClientError::NoContent.is_bad_format());
        assert!(ClientError::ParseError("x".into()).is_bad_format());
        assert!(!ClientError::api_error(500, "boom").is_bad_format());
        assert!(!ClientError::api_error(500, "boom").is_timeout());
    }

    #[test]
    fn test_unknown_state_is_a_parse_error() {
        let err: ClientError = ParseStateError("NOT_A_STATE".into()).into();
        assert!(err.is_bad_format());
        assert!(err.to_string().contains("NOT_A_STATE"));
    }

    #[test]
    fn test_count_overflow_is_a_parse_error() {
        let err: ClientError = SuitesDecodeError::CountOverflow(" ".into()).into();
        assert!(err.is_bad_format());
    }

    #[test]
    fn test_malformed_json_is_a_parse_error() {
        let json_err = serde_json::from_str::<serde_json::Value>("{oops").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(err.is_bad_format());
    }
}
