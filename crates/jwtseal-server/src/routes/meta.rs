//! Health, index and fallback endpoints

use axum::{
    extract::State,
    http::{Method, Uri},
    response::IntoResponse,
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::error::ApiError;
use crate::state::AppState;

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "success": true,
        "message": "JWT Token Server is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "uptime": state.started_at.elapsed().as_secs_f64(),
    }))
}

/// API index
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "message": "JWT Token Server API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "POST /api/generate-token": "Generate a new JWT token",
            "POST /api/issue-token": "Issue a JWT token for the configured API key",
            "POST /api/verify-token": "Verify an existing JWT token",
            "POST /api/decode-token": "Decode a JWT token without verification",
            "GET /api/health": "Health check endpoint"
        },
        "example_usage": {
            "generate_token": {
                "method": "POST",
                "url": "/api/generate-token",
                "headers": { "x-jwt-header": "{\"alg\":\"HS256\",\"typ\":\"JWT\"}" },
                "body": { "payload": { "sub": "user123" } },
                "description": "Generates a JWT token with the specified format"
            },
            "verify_token": {
                "method": "POST",
                "url": "/api/verify-token",
                "body": { "token": "your-jwt-token-here" },
                "description": "Verifies if a JWT token is valid"
            }
        }
    }))
}

pub async fn not_found(method: Method, uri: Uri) -> ApiError {
    ApiError::NotFound {
        method: method.to_string(),
        path: uri.path().to_string(),
    }
}
