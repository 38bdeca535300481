//! Error types for Easybill API operations.

use serde_json::Value;
use thiserror::Error;

/// Errors that can occur during Easybill API operations.
///
/// HTTP failures are classified into [`Authentication`](Self::Authentication),
/// [`NotFound`](Self::NotFound), [`RateLimited`](Self::RateLimited) or the
/// catch-all [`Api`](Self::Api). Each keeps the status code and the parsed
/// response body so callers can branch on the kind and inspect the payload.
#[derive(Debug, Error)]
pub enum EasybillError {
    /// Configuration is missing or incomplete.
    #[error("Easybill configuration required: {0}")]
    ConfigMissing(String),

    /// The configured base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The API rejected the credentials (401 or 403).
    #[error("{message}")]
    Authentication {
        message: String,
        status_code: u16,
        body: Option<Value>,
    },

    /// The requested resource does not exist (404).
    #[error("{message}")]
    NotFound {
        message: String,
        status_code: u16,
        body: Option<Value>,
    },

    /// Too many requests (429).
    #[error("{message}")]
    RateLimited {
        message: String,
        status_code: u16,
        body: Option<Value>,
    },

    /// Any other API failure, including transport and decoding errors.
    ///
    /// `status_code` and `body` are `None` when no HTTP response was received.
    #[error("{message}")]
    Api {
        message: String,
        status_code: Option<u16>,
        body: Option<Value>,
    },

    /// A payload field could not be mapped into its typed representation.
    #[error("Invalid value {value:?} for field '{field}': {reason}")]
    Mapping {
        field: &'static str,
        value: String,
        reason: String,
    },
}

impl EasybillError {
    /// Classify a non-success HTTP response.
    ///
    /// The message is taken from the body's `message` field when present,
    /// otherwise `transport_message` is used. `body` is `None` when the
    /// response body was not valid JSON.
    pub fn classify(status: u16, body: Option<Value>, transport_message: String) -> Self {
        let message = body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or(transport_message);

        match status {
            401 | 403 => Self::Authentication {
                message,
                status_code: status,
                body,
            },
            404 => Self::NotFound {
                message,
                status_code: status,
                body,
            },
            429 => Self::RateLimited {
                message,
                status_code: status,
                body,
            },
            _ => Self::Api {
                message,
                status_code: Some(status),
                body,
            },
        }
    }

    /// A request that never produced an HTTP response.
    pub(crate) fn transport(prefix: &str, err: reqwest::Error) -> Self {
        Self::Api {
            message: format!("{prefix}: {err}"),
            status_code: None,
            body: None,
        }
    }

    /// A response body that could not be decoded.
    pub(crate) fn decode(err: impl std::fmt::Display) -> Self {
        Self::Api {
            message: format!("Failed to parse API response: {err}"),
            status_code: None,
            body: None,
        }
    }

    /// Replace the message of a `NotFound` error, keeping status and body.
    ///
    /// Other kinds are returned unchanged.
    #[must_use]
    pub fn with_not_found_message(self, message: impl Into<String>) -> Self {
        match self {
            Self::NotFound {
                status_code, body, ..
            } => Self::NotFound {
                message: message.into(),
                status_code,
                body,
            },
            other => other,
        }
    }

    /// The HTTP status code, if the error came from an HTTP response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { status_code, .. }
            | Self::NotFound { status_code, .. }
            | Self::RateLimited { status_code, .. } => Some(*status_code),
            Self::Api { status_code, .. } => *status_code,
            _ => None,
        }
    }

    /// The parsed response body, if one was received and was valid JSON.
    pub fn body(&self) -> Option<&Value> {
        match self {
            Self::Authentication { body, .. }
            | Self::NotFound { body, .. }
            | Self::RateLimited { body, .. }
            | Self::Api { body, .. } => body.as_ref(),
            _ => None,
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}

/// Result type alias for Easybill operations.
pub type Result<T> = core::result::Result<T, EasybillError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn classify_with_body(status: u16) -> EasybillError {
        EasybillError::classify(
            status,
            Some(json!({"message": "Nope", "code": status})),
            "HTTP status client error".to_string(),
        )
    }

    #[test]
    fn test_classify_authentication() {
        for status in [401, 403] {
            let err = classify_with_body(status);
            assert!(err.is_authentication(), "{status} should be authentication");
            assert_eq!(err.status_code(), Some(status));
            assert_eq!(err.to_string(), "Nope");
        }
    }

    #[test]
    fn test_classify_not_found_and_rate_limit() {
        let err = classify_with_body(404);
        assert!(err.is_not_found());
        assert_eq!(err.status_code(), Some(404));

        let err = classify_with_body(429);
        assert!(err.is_rate_limited());
        assert_eq!(err.body().unwrap()["code"], 429);
    }

    #[test]
    fn test_classify_other_statuses_are_api_errors() {
        for status in [400, 409, 422, 500, 503] {
            let err = classify_with_body(status);
            match err {
                EasybillError::Api {
                    status_code, body, ..
                } => {
                    assert_eq!(status_code, Some(status));
                    assert!(body.is_some());
                }
                other => panic!("Expected Api error for {status}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_classify_without_json_body_uses_transport_message() {
        let err = EasybillError::classify(
            404,
            None,
            "HTTP status client error (404 Not Found)".to_string(),
        );
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "HTTP status client error (404 Not Found)");
        assert!(err.body().is_none());
    }

    #[test]
    fn test_classify_non_string_message_falls_back() {
        let err = EasybillError::classify(500, Some(json!({"message": 12})), "fallback".into());
        assert_eq!(err.to_string(), "fallback");
        assert_eq!(err.body(), Some(&json!({"message": 12})));
    }

    #[test]
    fn test_not_found_rewrap_keeps_status_and_body() {
        let err = classify_with_body(404).with_not_found_message("Customer 42 not found");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "Customer 42 not found");
        assert_eq!(err.status_code(), Some(404));
        assert_eq!(err.body().unwrap()["message"], "Nope");
    }

    #[test]
    fn test_rewrap_leaves_other_kinds_untouched() {
        let err = classify_with_body(401).with_not_found_message("Customer 42 not found");
        assert!(err.is_authentication());
        assert_eq!(err.to_string(), "Nope");
    }

    #[test]
    fn test_decode_error_has_no_status() {
        let err = EasybillError::decode("expected value at line 1 column 1");
        assert_eq!(err.status_code(), None);
        assert!(err.to_string().starts_with("Failed to parse API response"));
    }
}
