//! Dispatch trigger endpoints — POST /api/relances/send and the read-only
//! GET /api/relances/due diagnostic.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::warn;

use relance_core::Client;
use relance_dispatch::{select_due_clients, Dispatcher, RunReport};

use crate::app::AppState;
use crate::auth::{auth_failure_delay, bearer_ok};
use crate::http::{error, ApiError};

/// Both dispatch endpoints authenticate with the cron bearer secret. A
/// missing secret disables them outright — there is no unauthenticated mode.
async fn require_cron_secret(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(ref secret) = state.config.auth.cron_secret else {
        warn!("dispatch endpoint called but no cron secret is configured");
        return Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server configuration error",
        ));
    };
    if !bearer_ok(headers, secret) {
        auth_failure_delay().await;
        return Err(error(StatusCode::UNAUTHORIZED, "not authorized"));
    }
    Ok(())
}

fn debug_requested(headers: &HeaderMap) -> bool {
    headers
        .get("x-debug")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1")
        .unwrap_or(false)
}

/// POST /api/relances/send
///
/// Called by the external cron (or manually). Selects due clients, sends
/// through every configured channel, marks successes, returns the report.
/// `x-debug: 1` adds per-channel error detail and the eligible set echo.
pub async fn send_relances(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_cron_secret(&state, &headers).await?;

    let channels = state.build_channels();
    if channels.is_empty() {
        warn!("dispatch requested but no channel is configured");
        return Err(error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "server configuration error",
        ));
    }

    let verbose = debug_requested(&headers);
    let dispatcher = Dispatcher::new(
        state.store.clone(),
        channels,
        Duration::from_millis(state.config.dispatch.pace_ms),
    );

    let report: RunReport = dispatcher.run(Utc::now(), verbose).await.map_err(|e| {
        warn!(error = %e, "dispatch run aborted by store error");
        error(StatusCode::INTERNAL_SERVER_ERROR, "dispatch failed")
    })?;

    let mut body = serde_json::to_value(&report).map_err(|e| {
        warn!(error = %e, "report serialization failed");
        error(StatusCode::INTERNAL_SERVER_ERROR, "dispatch failed")
    })?;
    if verbose {
        body["debug"] = json!({
            "sms_configured": state.config.channels.sms.is_some(),
            "email_configured": state.config.channels.email.is_some(),
            "pace_ms": state.config.dispatch.pace_ms,
        });
    }
    Ok(Json(body))
}

/// GET /api/relances/due — the eligible set, without sending anything.
/// Operational verification for "what would go out right now".
pub async fn due_relances(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Client>>, ApiError> {
    require_cron_secret(&state, &headers).await?;

    let due = select_due_clients(state.store.as_ref(), Utc::now())
        .await
        .map_err(|e| {
            warn!(error = %e, "due selection failed");
            error(StatusCode::INTERNAL_SERVER_ERROR, "selection failed")
        })?;
    Ok(Json(due))
}
