//! HTTP error responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use jwtseal::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// Errors returned by route handlers
///
/// Rendered as `{"success": false, "error": ..., "message": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid or missing x-jwt-header. It must be a valid JSON string.")]
    InvalidJwtHeader,

    #[error("{0}")]
    MissingInput(&'static str),

    #[error("Invalid request body")]
    InvalidBody(String),

    #[error("Failed to generate JWT token")]
    Generate(#[source] jwtseal::Error),

    #[error("{}", verify_failure_label(.0.kind()))]
    Verify(#[source] jwtseal::Error),

    #[error("Invalid token format")]
    Decode(#[source] jwtseal::Error),

    #[error("Token issuing is not configured")]
    IssuerNotConfigured,

    #[error("Endpoint not found")]
    NotFound { method: String, path: String },
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

fn verify_failure_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::TokenExpired => "Token has expired",
        ErrorKind::MalformedToken | ErrorKind::MalformedSegment => "Invalid token format",
        _ => "Invalid token",
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidJwtHeader | Self::MissingInput(_) | Self::InvalidBody(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::Generate(e) => match e.kind() {
                ErrorKind::UnsupportedAlgorithm
                | ErrorKind::InvalidClaim
                | ErrorKind::Serialization => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Verify(_) => StatusCode::UNAUTHORIZED,
            Self::Decode(_) => StatusCode::BAD_REQUEST,
            Self::IssuerNotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
        }
    }

    fn message(&self) -> Option<String> {
        match self {
            Self::InvalidBody(detail) => Some(detail.clone()),
            Self::Generate(e) | Self::Verify(e) | Self::Decode(e) => Some(e.to_string()),
            Self::NotFound { method, path } => {
                Some(format!("{method} {path} is not a valid endpoint"))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{self}: {:?}", self.message());
        }

        let mut body = json!({
            "success": false,
            "error": self.to_string(),
        });
        if let Some(message) = self.message() {
            body["message"] = message.into();
        }

        (status, Json(body)).into_response()
    }
}
