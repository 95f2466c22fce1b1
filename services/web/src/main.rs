use anyhow::Result;
use bom_selector_utils::{init_logging, AppConfig};
use bom_selector_web::{create_app, metrics, AppState};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration, using defaults: {}", e);
        AppConfig::default()
    });

    init_logging(&config.logging)?;
    info!("Starting BOM Selector");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config)?;
    metrics::init();

    let app = create_app(state);

    let listener = TcpListener::bind(&addr).await?;
    info!("BOM Selector listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
