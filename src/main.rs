//! Payroll engine HTTP server.
//!
//! Reads `engine.yaml` from `PAYROLL_CONFIG_DIR` (default `./config`),
//! seeds the in-memory store from the configured seed file, and serves the
//! API on the configured address.

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use payroll_engine::store::{MemoryStore, SeedData};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "payroll_engine=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config_dir =
        std::env::var("PAYROLL_CONFIG_DIR").unwrap_or_else(|_| "./config".to_string());
    let config = ConfigLoader::load_or_default(&config_dir)?.into_config();

    let store = match &config.seed_file {
        Some(path) => SeedData::load(path)?.into_store()?,
        None => MemoryStore::new(),
    };

    let bind_addr = config.server.bind_addr.clone();
    let router = create_router(AppState::new(config, store));

    let listener = TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "Payroll engine listening");
    axum::serve(listener, router).await?;

    Ok(())
}
