//! Application lifecycle.

use crate::{di::ServiceContainer, startup};
use pantry_config::AppConfig;
use pantry_core::{telemetry::shutdown_telemetry, PantryError, PantryResult};
use pantry_repository::{create_pool, seed_products, DatabasePoolInterface};
use pantry_rest::{create_router, AppState};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

/// The catalog server: connects its backends, then serves HTTP until a
/// shutdown signal arrives.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Creates the application from loaded configuration.
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration the application runs with.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the server to completion.
    pub async fn run(self) -> PantryResult<()> {
        let config = self.config;
        info!("Environment: {}", config.app.environment);

        let db_pool = create_pool(&config.database).await?;
        if config.database.run_migrations {
            db_pool.run_migrations().await?;
        }

        let container = ServiceContainer::build(&config, db_pool.clone());

        if config.database.seed_on_start {
            seed_products(container.repository.as_ref()).await?;
        }

        let database: Arc<dyn DatabasePoolInterface> = db_pool.clone();
        let state = AppState::new(container.product_service.clone()).with_database(database);
        let router = create_router(state, &config.server, &config.rate_limit);

        let addr = config.server.addr();
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| PantryError::Internal(format!("Failed to bind {addr}: {e}")))?;

        startup::print_startup_info(&addr, container.cache.is_enabled());

        axum::serve(
            listener,
            router.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(startup::shutdown_signal())
        .await
        .map_err(|e| PantryError::Internal(format!("REST server error: {e}")))?;

        db_pool.close().await;
        shutdown_telemetry();

        info!("Server shutdown complete");
        Ok(())
    }
}
