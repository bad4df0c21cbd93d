//! Client CRUD endpoints, session-gated.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    Json,
};
use chrono::{DateTime, Months, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::warn;

use relance_core::client::{Client, ClientPatch, NewClient};
use relance_core::validate;
use relance_store::StoreError;

use crate::app::AppState;
use crate::auth::session_ok;
use crate::http::{error, validation_error, ApiError};

fn require_session(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    if session_ok(headers, &state.config.auth.session_secret) {
        Ok(())
    } else {
        Err(error(StatusCode::UNAUTHORIZED, "not authorized"))
    }
}

fn store_error(context: &str, e: StoreError) -> ApiError {
    match e {
        StoreError::NotFound { ref id } => {
            warn!(error = %e, id = %id, "{context}: client not found");
            error(StatusCode::NOT_FOUND, "client not found")
        }
        other => {
            warn!(error = %other, "{context}: store error");
            error(StatusCode::INTERNAL_SERVER_ERROR, "store error")
        }
    }
}

/// GET /api/clients — all clients, newest first.
pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Client>>, ApiError> {
    require_session(&state, &headers)?;
    let clients = state
        .store
        .list()
        .await
        .map_err(|e| store_error("list clients", e))?;
    Ok(Json(clients))
}

#[derive(Debug, Deserialize)]
pub struct CreateClientRequest {
    prenom: String,
    nom: String,
    telephone: String,
    #[serde(default)]
    message_relance: String,
    #[serde(default)]
    date_relance: Option<DateTime<Utc>>,
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateClientRequest>,
) -> Result<(StatusCode, Json<Client>), ApiError> {
    require_session(&state, &headers)?;

    let prenom = validate::sanitize(&req.prenom);
    let nom = validate::sanitize(&req.nom);
    let telephone = validate::sanitize(&req.telephone);
    let message_relance = validate::sanitize(&req.message_relance);

    validate::validate_name(&prenom)
        .and(validate::validate_name(&nom))
        .map_err(validation_error)?;
    if !validate::validate_phone(&telephone) {
        return Err(error(
            StatusCode::BAD_REQUEST,
            "invalid phone number format (e.g. 0612345678 or +33612345678)",
        ));
    }
    validate::validate_message(&message_relance)
        .map_err(validation_error)?;

    let created = state
        .store
        .create(NewClient {
            prenom,
            nom,
            telephone,
            message_relance,
            date_relance: req.date_relance,
        })
        .await
        .map_err(|e| store_error("create client", e))?;

    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Deserialize)]
pub struct UpdateClientRequest {
    #[serde(default)]
    prenom: Option<String>,
    #[serde(default)]
    nom: Option<String>,
    #[serde(default)]
    telephone: Option<String>,
    #[serde(default)]
    message_relance: Option<String>,
    /// Absent = untouched, `null` = clear, value = set.
    #[serde(default, deserialize_with = "deserialize_explicit")]
    date_relance: Option<Option<DateTime<Utc>>>,
}

/// Wraps a present field (even an explicit `null`) in `Some`, so absence and
/// `null` stay distinguishable.
fn deserialize_explicit<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: serde::Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// PUT /api/clients/{id}
pub async fn update_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<UpdateClientRequest>,
) -> Result<Json<Client>, ApiError> {
    require_session(&state, &headers)?;

    let mut patch = ClientPatch::default();
    if let Some(prenom) = req.prenom {
        let prenom = validate::sanitize(&prenom);
        validate::validate_name(&prenom).map_err(validation_error)?;
        patch.prenom = Some(prenom);
    }
    if let Some(nom) = req.nom {
        let nom = validate::sanitize(&nom);
        validate::validate_name(&nom).map_err(validation_error)?;
        patch.nom = Some(nom);
    }
    if let Some(telephone) = req.telephone {
        let telephone = validate::sanitize(&telephone);
        if !validate::validate_phone(&telephone) {
            return Err(error(StatusCode::BAD_REQUEST, "invalid phone number format"));
        }
        patch.telephone = Some(telephone);
    }
    if let Some(message) = req.message_relance {
        let message = validate::sanitize(&message);
        validate::validate_message(&message).map_err(validation_error)?;
        patch.message_relance = Some(message);
    }
    patch.date_relance = req.date_relance;

    let updated = state
        .store
        .update(&id, patch)
        .await
        .map_err(|e| store_error("update client", e))?;
    Ok(Json(updated))
}

/// DELETE /api/clients/{id}
pub async fn delete_client(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_session(&state, &headers)?;
    state
        .store
        .delete(&id)
        .await
        .map_err(|e| store_error("delete client", e))?;
    Ok(Json(json!({ "ok": true })))
}

/// Allowed relative offsets for the due date, in months.
const RELANCE_OFFSETS: [u32; 3] = [6, 12, 18];

#[derive(Debug, Deserialize)]
pub struct SetRelanceRequest {
    /// Absolute due date; explicit `null` clears the reminder.
    #[serde(default)]
    date_relance: Option<DateTime<Utc>>,
    /// Relative offset from now — 6, 12 or 18 months.
    #[serde(default)]
    offset_months: Option<u32>,
}

/// PUT /api/clients/{id}/relance — set, shift or clear the due date only.
/// The last-sent marker is never writable from here.
pub async fn set_relance_date(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(req): Json<SetRelanceRequest>,
) -> Result<Json<Client>, ApiError> {
    require_session(&state, &headers)?;

    let date = match (req.date_relance, req.offset_months) {
        (Some(_), Some(_)) => {
            return Err(error(
                StatusCode::BAD_REQUEST,
                "provide either date_relance or offset_months, not both",
            ));
        }
        (None, Some(months)) => {
            if !RELANCE_OFFSETS.contains(&months) {
                return Err(error(
                    StatusCode::BAD_REQUEST,
                    "offset_months must be 6, 12 or 18",
                ));
            }
            Utc::now()
                .checked_add_months(Months::new(months))
                .map(Some)
                .ok_or_else(|| error(StatusCode::BAD_REQUEST, "offset out of range"))?
        }
        (date, None) => date,
    };

    let updated = state
        .store
        .set_relance_date(&id, date)
        .await
        .map_err(|e| store_error("set relance date", e))?;
    Ok(Json(updated))
}
