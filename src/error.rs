//! Error types for the Graylog REST client.

use thiserror::Error;

/// Error for invalid HTTP header configuration.
#[derive(Debug, Clone, Error)]
pub enum InvalidHeaderError {
    #[error("invalid header name: {0}")]
    InvalidName(String),
    #[error("invalid header value: {0}")]
    InvalidValue(String),
}

/// A request payload failed its field constraints.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid {field}: {reason}")]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

impl ValidationError {
    pub(crate) fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Main error type for API operations.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unexpected status {status} from {url}: {body}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("invalid json from {url}: {message}")]
    Json { url: String, message: String },

    #[error("empty response body from {url}")]
    EmptyBody { url: String },

    #[error("failed to serialize request body for {url}: {message}")]
    Serialize { url: String, message: String },

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("timeout")]
    Timeout,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    InvalidHeader(#[from] InvalidHeaderError),

    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// HTTP status code if the server answered.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            ApiError::UnexpectedStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the request never produced a usable HTTP response.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ApiError::Network(_) | ApiError::Timeout | ApiError::Serialize { .. }
        )
    }

    pub(crate) fn json(url: &str, err: serde_json::Error) -> Self {
        ApiError::Json {
            url: url.to_string(),
            message: err.to_string(),
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else {
            ApiError::Network(err)
        }
    }
}

impl From<chrono::ParseError> for ApiError {
    fn from(err: chrono::ParseError) -> Self {
        ApiError::Parse(format!("invalid timestamp: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code_only_for_http_failures() {
        let err = ApiError::UnexpectedStatus {
            status: 500,
            url: "http://localhost/streams".to_string(),
            body: "boom".to_string(),
        };
        assert_eq!(err.status_code(), Some(500));
        assert!(!err.is_transport());

        assert_eq!(ApiError::Timeout.status_code(), None);
        assert!(ApiError::Timeout.is_transport());
    }

    #[test]
    fn test_validation_error_message() {
        let err: ApiError = ValidationError::new("title", "must not be empty").into();
        assert_eq!(err.to_string(), "invalid title: must not be empty");
    }
}
