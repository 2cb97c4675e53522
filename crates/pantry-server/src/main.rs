//! # Pantry Catalog Server
//!
//! Main entry point for the Pantry product catalog.

use pantry_config::load_config;
use pantry_core::telemetry::{init_logging, init_telemetry, TelemetryConfig};
use pantry_server::{startup, Application};
use tracing::error;

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&TelemetryConfig::default());
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let telemetry = config.observability.telemetry_config(&config.app.name);
    if let Err(e) = init_telemetry(&telemetry) {
        eprintln!("Failed to initialize logging: {e}");
    }

    startup::print_banner(&config.app.version);

    if let Err(e) = Application::new(config).run().await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}
