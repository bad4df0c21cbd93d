//! Operator session endpoints — POST /api/auth/login, /logout, GET /check.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tracing::warn;

use relance_core::config::{SESSION_MAX_AGE_SECS, SESSION_REMEMBER_MAX_AGE_SECS};

use crate::app::AppState;
use crate::auth::{
    auth_failure_delay, clear_session_cookie, constant_time_eq, session_cookie, session_ok,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    password: String,
    #[serde(default)]
    remember_me: bool,
}

/// POST /api/auth/login
///
/// Verifies the operator password in constant time and hands out the session
/// cookie. Every mismatch answers 401 after a fixed delay.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Response {
    if req.password.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "password is required" })),
        )
            .into_response();
    }

    let expected = state.config.auth.password.trim();
    if expected.is_empty() {
        warn!("login attempted but no password is configured");
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": "server configuration error" })),
        )
            .into_response();
    }

    if !constant_time_eq(req.password.trim().as_bytes(), expected.as_bytes()) {
        auth_failure_delay().await;
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": "invalid credentials" })),
        )
            .into_response();
    }

    let max_age = if req.remember_me {
        SESSION_REMEMBER_MAX_AGE_SECS
    } else {
        SESSION_MAX_AGE_SECS
    };
    let cookie = session_cookie(&state.config.auth.session_secret, max_age);

    (
        [(header::SET_COOKIE, cookie)],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

/// POST /api/auth/logout — clears the session cookie.
pub async fn logout() -> Response {
    (
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

/// GET /api/auth/check — reports whether the request carries a valid session.
pub async fn check(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let authenticated = session_ok(&headers, &state.config.auth.session_secret);
    Json(json!({ "authenticated": authenticated })).into_response()
}
