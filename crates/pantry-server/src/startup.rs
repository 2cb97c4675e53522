//! Server startup utilities.

use tokio::signal;
use tracing::{info, warn};

/// Prints the startup banner.
pub fn print_banner(version: &str) {
    info!(
        r"
    ____              __
   / __ \____ _____  / /________  __
  / /_/ / __ `/ __ \/ __/ ___/ / / /
 / ____/ /_/ / / / / /_/ /  / /_/ /
/_/    \__,_/_/ /_/\__/_/   \__, /
                           /____/   v{version}
    "
    );
}

/// Prints server startup information.
pub fn print_startup_info(addr: &str, cache_enabled: bool) {
    let separator = "=".repeat(60);
    info!("{}", separator);
    info!("REST API:  http://{}/api/v1/products", addr);
    info!("Health:    http://{}/health", addr);
    info!("API Docs:  http://{}/swagger-ui", addr);
    info!("Cache:     {}", if cache_enabled { "redis" } else { "disabled" });
    info!("{}", separator);
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
