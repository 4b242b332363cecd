//! HTTP server for the payroll engine.
//!
//! Environment:
//!
//! - `PAYROLL_CONFIG_DIR`: directory holding `engine.yaml` and
//!   `settlement.yaml` (default `./config/co`)
//! - `PAYROLL_BIND_ADDR`: listen address (default `0.0.0.0:3000`)
//! - `PAYROLL_SEED_FILE`: optional YAML file with employees, contracts and
//!   salary history
//! - `RUST_LOG`: log filter (default `info`)

use std::env;
use std::sync::Arc;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::engine::{InMemoryDirectory, InMemoryStore, PayrollEngine};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_CONFIG_DIR: &str = "./config/co";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    init_tracing();

    let config_dir = env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| DEFAULT_CONFIG_DIR.to_string());
    let addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());

    let config = ConfigLoader::load(&config_dir)?.into_config();
    info!(config_dir = %config_dir, "Configuration loaded");

    let directory = match env::var("PAYROLL_SEED_FILE") {
        Ok(path) => {
            let directory = InMemoryDirectory::load_seed(&path)?;
            info!(seed_file = %path, "Directory seeded");
            directory
        }
        Err(_) => InMemoryDirectory::new(),
    };
    let directory = Arc::new(directory);

    let engine = PayrollEngine::new(
        config,
        Arc::new(InMemoryStore::new()),
        directory.clone(),
        directory,
    )?;
    let app = create_router(AppState::new(engine));

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "Payroll engine listening");
    axum::serve(listener, app).await?;
    Ok(())
}
