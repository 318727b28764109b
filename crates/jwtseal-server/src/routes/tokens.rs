//! Token endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    routing::post,
    Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use jwtseal::{decode, sign, Header, Payload, Token};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Header carrying the caller's JWT header as JSON
pub const JWT_HEADER: &str = "x-jwt-header";

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/generate-token", post(generate_token))
        .route("/issue-token", post(issue_token))
        .route("/verify-token", post(verify_token))
        .route("/decode-token", post(decode_token))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    payload: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    success: bool,
    token: Token,
}

#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    success: bool,
    message: &'static str,
    decoded: Payload,
    expires_at: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DecodeResponse {
    success: bool,
    header: Header,
    payload: Payload,
    expires_at: Option<String>,
}

/// ISO-8601 with millisecond precision and a `Z` suffix
fn iso8601(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn read_body<T>(body: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    body.map(|Json(body)| body)
        .map_err(|rejection| ApiError::InvalidBody(rejection.body_text()))
}

fn jwt_header(headers: &HeaderMap) -> ApiResult<Header> {
    let raw = headers
        .get(JWT_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(ApiError::InvalidJwtHeader)?;
    let value: Value = serde_json::from_str(raw).map_err(|_| ApiError::InvalidJwtHeader)?;
    Header::try_from(value).map_err(|_| ApiError::InvalidJwtHeader)
}

fn required_token(request: TokenRequest) -> ApiResult<String> {
    request
        .token
        .filter(|token| !token.is_empty())
        .ok_or(ApiError::MissingInput("Token is required"))
}

/// Sign a caller-supplied header and payload
async fn generate_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Result<Json<GenerateRequest>, JsonRejection>,
) -> ApiResult<Json<TokenResponse>> {
    let header = jwt_header(&headers)?;
    let payload = match read_body(body)?.payload {
        Some(Value::Null) | None => {
            return Err(ApiError::MissingInput(
                "Both x-jwt-header and payload are required.",
            ))
        }
        Some(value) => Payload::try_from(value)
            .map_err(|_| ApiError::MissingInput("payload must be a JSON object."))?,
    };

    let token = sign(&header, &payload, state.secret.as_bytes()).map_err(ApiError::Generate)?;
    debug!(alg = header.algorithm().unwrap_or("HS256"), "Generated token");

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Sign a token for the configured API key with a fixed header and expiry
async fn issue_token(State(state): State<AppState>) -> ApiResult<Json<TokenResponse>> {
    let api_key = state.api_key.as_deref().ok_or(ApiError::IssuerNotConfigured)?;

    let issued_at = Utc::now().timestamp();
    let payload = Payload::issue(api_key, issued_at, state.token_ttl);
    let token = sign(&Header::new(state.algorithm()), &payload, state.secret.as_bytes())
        .map_err(ApiError::Generate)?;
    info!(jti = payload.jwt_id(), "Issued token");

    Ok(Json(TokenResponse {
        success: true,
        token,
    }))
}

/// Verify signature, algorithm and expiry
async fn verify_token(
    State(state): State<AppState>,
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<VerifyResponse>> {
    let token = required_token(read_body(body)?)?;

    let verified = state
        .validator
        .verify(&token, state.secret.as_bytes())
        .map_err(|e| {
            if e.is_verification_failure() {
                warn!(kind = ?e.kind(), "Token verification failed: {e}");
            } else {
                debug!(kind = ?e.kind(), "Token rejected: {e}");
            }
            ApiError::Verify(e)
        })?;

    let expires_at = verified.expires_at().map(iso8601);
    Ok(Json(VerifyResponse {
        success: true,
        message: "Token is valid",
        decoded: verified.into_payload(),
        expires_at,
    }))
}

/// Decode without verification, for debugging
async fn decode_token(
    body: Result<Json<TokenRequest>, JsonRejection>,
) -> ApiResult<Json<DecodeResponse>> {
    let token = required_token(read_body(body)?)?;
    let decoded = decode(&token).map_err(ApiError::Decode)?;

    let expires_at = decoded.expires_at().map(iso8601);
    let (header, payload) = decoded.into_parts();
    Ok(Json(DecodeResponse {
        success: true,
        header,
        payload,
        expires_at,
    }))
}
