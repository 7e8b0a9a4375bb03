use std::env;

use hr_engine::api::{create_router, AppState};
use hr_engine::config::ConfigLoader;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_DIR: &str = "./config/default";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let config_dir = env::var("HR_ENGINE_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let config = ConfigLoader::load(&config_dir)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server().log_filter)),
        )
        .init();
    info!(config_dir = %config_dir, "Configuration loaded");

    let bind_addr = config.server().bind_addr.clone();
    let router = create_router(AppState::new(config));

    let listener = TcpListener::bind(&bind_addr)
        .await
        .inspect_err(|e| error!(bind_addr = %bind_addr, error = %e, "Failed to bind"))?;
    info!(bind_addr = %bind_addr, "HR engine listening");

    axum::serve(listener, router).await?;
    Ok(())
}
