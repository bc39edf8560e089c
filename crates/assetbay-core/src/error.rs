//! Error types module
//!
//! All API-boundary failures are normalized into [`ApiError`]. Server-reported
//! errors carry the structured `{code, message}` payload verbatim; transport
//! and decode failures surface a generic message to the user.

use crate::models::ErrorBody;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Network/connectivity failure before a response was obtained.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The server returned a structured error payload.
    #[error("{message}")]
    Server { code: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// No API key is configured; the call was skipped, not sent.
    #[error("API key is not configured")]
    NotConfigured,
}

impl ApiError {
    /// Human-readable message for notifications. Server messages are surfaced
    /// verbatim; everything else collapses to the generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Server { message, .. } => message.clone(),
            ApiError::NotConfigured => self.to_string(),
            ApiError::Transport(_) | ApiError::Decode(_) => "Unknown error".to_string(),
        }
    }

    pub fn is_not_configured(&self) -> bool {
        matches!(self, ApiError::NotConfigured)
    }
}

impl From<ErrorBody> for ApiError {
    fn from(body: ErrorBody) -> Self {
        ApiError::Server {
            code: body.code,
            message: body.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_surfaced_verbatim() {
        let err = ApiError::Server {
            code: 400,
            message: "unsupported type".to_string(),
        };
        assert_eq!(err.user_message(), "unsupported type");
        assert_eq!(err.to_string(), "unsupported type");
    }

    #[test]
    fn transport_and_decode_fall_back_to_generic() {
        let err = ApiError::Transport("connection refused".to_string());
        assert_eq!(err.user_message(), "Unknown error");

        let err = ApiError::Decode("expected value at line 1".to_string());
        assert_eq!(err.user_message(), "Unknown error");
    }

    #[test]
    fn error_body_converts_to_server_variant() {
        let err: ApiError = ErrorBody {
            code: 404,
            message: "Asset not found".to_string(),
        }
        .into();
        match err {
            ApiError::Server { code, message } => {
                assert_eq!(code, 404);
                assert_eq!(message, "Asset not found");
            }
            other => panic!("unexpected variant: {other:?}"),
        }
    }

    #[test]
    fn not_configured_is_detectable() {
        assert!(ApiError::NotConfigured.is_not_configured());
        assert!(!ApiError::Transport("x".into()).is_not_configured());
    }
}
