//! Error types for halo-ui
//!
//! Every fetch-path failure is caught at the HTTP boundary and converted to
//! a flat `{error: string}` body; nothing propagates as an unhandled fault.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::providers::ProviderError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Required `ref` query parameter absent (400)
    #[error("Missing Bible reference.")]
    MissingReference,

    /// Credentialed provider selected without a configured key (401)
    #[error("ESV requires an API key. Set ESV_API_KEY on the server.")]
    EsvKeyMissing,

    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// Resource not found (404)
    #[error("{0}")]
    NotFound(String),

    /// Upstream provider failure, propagated with the provider's status
    #[error("{message}")]
    Upstream { status: u16, message: String },

    /// Network failure or malformed provider body (500, generic message)
    #[error("Unable to load this chapter right now.")]
    Unavailable,

    /// Internal server error (500)
    #[error("{0}")]
    Internal(String),
}

impl From<ProviderError> for ApiError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Upstream { status, message } => ApiError::Upstream { status, message },
            // Do not leak transport or parse details to the caller
            ProviderError::Network(_) | ProviderError::Parse(_) => ApiError::Unavailable,
        }
    }
}

impl From<halo_common::Error> for ApiError {
    fn from(err: halo_common::Error) -> Self {
        match err {
            halo_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            halo_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingReference | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::EsvKeyMissing => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Upstream { status, .. } => StatusCode::from_u16(*status)
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            ApiError::Unavailable | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_error_mapping() {
        let err: ApiError = ProviderError::Network("connection refused".to_string()).into();
        assert!(matches!(err, ApiError::Unavailable));
        // Generic message, no transport detail
        assert_eq!(err.to_string(), "Unable to load this chapter right now.");

        let err: ApiError = ProviderError::Upstream {
            status: 404,
            message: "not found".to_string(),
        }
        .into();
        assert!(matches!(err, ApiError::Upstream { status: 404, .. }));
    }
}
