use std::{env, net::SocketAddr, path::Path};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use service::{storage::seed, UserStore};

use crate::errors::StartupError;
use crate::observability::USERS_STORED;
use crate::routes::{self, ServerState};

/// Bind address and seed location resolved from config or env.
#[derive(Debug, Clone)]
pub struct Settings {
    pub addr: SocketAddr,
    pub seed_path: String,
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load settings from `CONFIG_PATH` / `config.toml`
pub fn load_settings() -> Result<Settings, StartupError> {
    settings_from_file(&configs::config_path())
}

/// Settings from the given config file. Only an absent file falls back to env vars;
/// a file that exists but cannot be read, parsed or validated is a startup error.
pub fn settings_from_file(path: &str) -> Result<Settings, StartupError> {
    let (host, port, seed_path) = if Path::new(path).exists() {
        let cfg = configs::AppConfig::load_and_validate_from(path)
            .map_err(|e| StartupError::InvalidConfig(format!("{path}: {e:#}")))?;
        (cfg.server.host, cfg.server.port, cfg.data.seed_path)
    } else {
        warn!(path, "config file not found; using environment");
        let host = env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("SERVER_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);
        (host, port, configs::seed_path_from_env())
    };
    let addr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address {host}:{port}: {e}")))?;
    Ok(Settings { addr, seed_path })
}

/// Build the store from the seed file; a missing or malformed file yields an empty store.
pub async fn build_state(seed_path: &str) -> ServerState {
    let records = seed::load_seed_or_empty(seed_path).await;
    let store = UserStore::from_seed(records);
    let count = store.len().await;
    USERS_STORED.set(count as i64);
    info!(count, "user store ready");
    ServerState::new(store)
}

pub fn build_app(state: ServerState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve the app on an already bound listener
pub async fn serve(listener: TcpListener, state: ServerState) -> anyhow::Result<()> {
    axum::serve(listener, build_app(state)).await?;
    Ok(())
}

/// Public entry: build the store and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    let settings = load_settings()?;
    let state = build_state(&settings.seed_path).await;

    let listener = TcpListener::bind(settings.addr).await?;
    info!(addr = %settings.addr, "starting user directory server");
    serve(listener, state).await
}
