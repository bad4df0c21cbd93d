use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

mod app;
mod auth;
mod http;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relance_gateway=info,tower_http=debug".into()),
        )
        .init();

    // load config: explicit path > RELANCE_CONFIG env > ~/.relance/relance.toml
    let config_path = std::env::var("RELANCE_CONFIG").ok();
    let config = relance_core::config::RelanceConfig::load(config_path.as_deref())?;

    let bind = config.gateway.bind.clone();
    let port = config.gateway.port;

    let store: Arc<dyn relance_store::ClientStore> =
        Arc::new(relance_store::RestStore::new(&config.store));

    let state = Arc::new(app::AppState::new(config, store));
    let router = app::build_router(state);

    let addr: SocketAddr = format!("{}:{}", bind, port).parse()?;
    info!("Relance gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
