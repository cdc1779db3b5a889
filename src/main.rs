mod capture;
mod config;
mod error;
mod gateway;
mod geocode;
mod itinerary;
mod llm;
mod routes;
mod state;

use anyhow::Result;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::Config;
use state::AppState;

fn load_config() -> Result<Config> {
    let config_paths: Vec<String> = vec![
        std::env::var("CONFIG_PATH").ok(),
        Some("conf.yaml".to_string()),
        Some("conf.json".to_string()),
    ]
    .into_iter()
    .flatten()
    .collect();

    for path in &config_paths {
        if !std::path::Path::new(path).exists() {
            continue;
        }
        let config = Config::load(path)
            .map_err(|e| anyhow::anyhow!("Invalid config file {}: {}", path, e))?;
        info!("Loaded configuration from: {}", path);
        return Ok(config);
    }

    warn!("No config file found (tried {:?}); using defaults", config_paths);
    Ok(Config::default())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("traveler_backend=debug,tower_http=debug")),
        )
        .init();

    let config = load_config()?;
    let app_state = AppState::new(config.clone());

    let app = routes::create_routes()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state.clone());

    let system_config = &config.system_config;
    let listener = tokio::net::TcpListener::bind((system_config.host.as_str(), system_config.port)).await?;
    info!("Starting server on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Release the camera before exiting.
    app_state.camera.close().await;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
    }
}
