//! Shared-secret verification for the operator session and the cron trigger.

use std::time::Duration;

use axum::http::{header, HeaderMap};
use cookie::Cookie;

use relance_core::config::SESSION_COOKIE;

/// Byte-wise comparison without early exit on content; only the length check
/// short-circuits.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

/// True iff the request carries a session cookie matching the secret.
pub fn session_ok(headers: &HeaderMap, session_secret: &str) -> bool {
    let Some(raw) = headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) else {
        return false;
    };
    for part in raw.split(';') {
        if let Ok(c) = Cookie::parse(part.trim()) {
            if c.name() == SESSION_COOKIE {
                return constant_time_eq(c.value().as_bytes(), session_secret.as_bytes());
            }
        }
    }
    false
}

/// `Authorization: Bearer <secret>` check for the dispatch trigger.
pub fn bearer_ok(headers: &HeaderMap, secret: &str) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|token| constant_time_eq(token.as_bytes(), secret.as_bytes()))
        .unwrap_or(false)
}

/// Build the Set-Cookie value for a fresh session.
pub fn session_cookie(secret: &str, max_age_secs: i64) -> String {
    let mut c = Cookie::new(SESSION_COOKIE, secret.to_string());
    c.set_http_only(true);
    c.set_same_site(cookie::SameSite::Strict);
    c.set_path("/");
    c.set_max_age(cookie::time::Duration::seconds(max_age_secs));
    c.to_string()
}

/// Set-Cookie value that clears the session.
pub fn clear_session_cookie() -> String {
    let mut c = Cookie::new(SESSION_COOKIE, "");
    c.set_http_only(true);
    c.set_same_site(cookie::SameSite::Strict);
    c.set_path("/");
    c.set_max_age(cookie::time::Duration::seconds(0));
    c.to_string()
}

/// Fixed delay applied to every credential mismatch, so failure latency does
/// not depend on where the comparison diverged.
pub async fn auth_failure_delay() {
    tokio::time::sleep(Duration::from_millis(100)).await;
}
