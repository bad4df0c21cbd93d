use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use relance_channels::{Channel, EmailChannel, SmsChannel};
use relance_core::config::RelanceConfig;
use relance_store::ClientStore;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: RelanceConfig,
    pub store: Arc<dyn ClientStore>,
}

impl AppState {
    pub fn new(config: RelanceConfig, store: Arc<dyn ClientStore>) -> Self {
        Self { config, store }
    }

    /// Channel adapters for one dispatch invocation. A channel exists iff its
    /// credential block is configured — there is no other enable switch.
    pub fn build_channels(&self) -> Vec<Arc<dyn Channel>> {
        let mut channels: Vec<Arc<dyn Channel>> = Vec::new();
        if let Some(ref sms) = self.config.channels.sms {
            channels.push(Arc::new(SmsChannel::new(sms.clone())));
        }
        if let Some(ref email) = self.config.channels.email {
            channels.push(Arc::new(EmailChannel::new(email.clone())));
        }
        channels
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/api/auth/login", post(crate::http::auth::login))
        .route("/api/auth/logout", post(crate::http::auth::logout))
        .route("/api/auth/check", get(crate::http::auth::check))
        .route(
            "/api/clients",
            get(crate::http::clients::list_clients).post(crate::http::clients::create_client),
        )
        .route(
            "/api/clients/{id}",
            put(crate::http::clients::update_client).delete(crate::http::clients::delete_client),
        )
        .route(
            "/api/clients/{id}/relance",
            put(crate::http::clients::set_relance_date),
        )
        .route("/api/relances/send", post(crate::http::relances::send_relances))
        .route("/api/relances/due", get(crate::http::relances::due_relances))
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
