//! Error types for the Primer client

use http::StatusCode;
use thiserror::Error;

/// Result type alias for Primer client operations
pub type Result<T> = std::result::Result<T, PrimerError>;

/// Main error type for Primer client operations
#[derive(Error, Debug)]
pub enum PrimerError {
    /// The API key was blank when the client was built
    #[error("API Key credentials missing")]
    CredentialsMissing,

    /// The base URL was blank when the client was built
    #[error("base URL missing")]
    BaseUrlMissing,

    /// A mutating call was made without an idempotency key
    #[error("X-Idempotency-Key missing")]
    IdempotencyKeyMissing,

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A header value could not be encoded
    #[error("Invalid value for header {name}: {source}")]
    InvalidHeader {
        name: http::header::HeaderName,
        #[source]
        source: http::header::InvalidHeaderValue,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// The API answered with a status other than 200 or 204
    #[error("API error {}: {}", .0.status, .0.message)]
    Api(ApiError),
}

/// A non-success response returned by the Primer API.
///
/// The body is kept verbatim as text; it is not parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP status returned by the API
    pub status: StatusCode,
    /// Raw response body
    pub message: String,
    /// Value of the request id header, if the API returned one
    pub request_id: Option<String>,
}

impl PrimerError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an API error from a response status, body and request id
    pub fn api(
        status: StatusCode,
        message: impl Into<String>,
        request_id: Option<String>,
    ) -> Self {
        Self::Api(ApiError {
            status,
            message: message.into(),
            request_id,
        })
    }

    /// Whether the error was raised below the API layer (I/O, encoding, decoding)
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Json(_) | Self::InvalidHeader { .. })
    }

    /// HTTP status associated with the error.
    ///
    /// API errors carry the status the server returned; transport failures report
    /// `500 Internal Server Error`. Construction and usage errors have no status.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api(err) => Some(err.status),
            _ if self.is_transport() => Some(StatusCode::INTERNAL_SERVER_ERROR),
            _ => None,
        }
    }

    /// Error message: the raw response body for API errors, the display text otherwise
    pub fn message(&self) -> String {
        match self {
            Self::Api(err) => err.message.clone(),
            Self::Http(err) => err.to_string(),
            Self::Json(err) => err.to_string(),
            Self::InvalidHeader { source, .. } => source.to_string(),
            other => other.to_string(),
        }
    }

    /// Request id returned by the API, only available on API errors
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::Api(err) => err.request_id.as_deref(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_accessors() {
        let error = PrimerError::api(
            StatusCode::PAYMENT_REQUIRED,
            "card declined",
            Some("r-1".to_string()),
        );

        assert_eq!(error.status(), Some(StatusCode::PAYMENT_REQUIRED));
        assert_eq!(error.message(), "card declined");
        assert_eq!(error.request_id(), Some("r-1"));
        assert!(!error.is_transport());
        assert_eq!(error.to_string(), "API error 402 Payment Required: card declined");
    }

    #[test]
    fn test_json_error_is_transport() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let text = source.to_string();
        let error = PrimerError::from(source);

        assert!(error.is_transport());
        assert_eq!(error.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(error.message(), text);
        assert_eq!(error.request_id(), None);
    }

    #[test]
    fn test_usage_errors_have_no_status() {
        for error in [
            PrimerError::CredentialsMissing,
            PrimerError::BaseUrlMissing,
            PrimerError::IdempotencyKeyMissing,
            PrimerError::config("bad timeout"),
        ] {
            assert_eq!(error.status(), None);
            assert_eq!(error.request_id(), None);
            assert!(!error.is_transport());
        }
    }

    #[test]
    fn test_sentinel_messages() {
        assert_eq!(
            PrimerError::CredentialsMissing.to_string(),
            "API Key credentials missing"
        );
        assert_eq!(PrimerError::BaseUrlMissing.to_string(), "base URL missing");
        assert_eq!(
            PrimerError::IdempotencyKeyMissing.message(),
            "X-Idempotency-Key missing"
        );
    }
}
