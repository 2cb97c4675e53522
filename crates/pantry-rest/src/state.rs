//! Application state for Axum handlers.

use pantry_repository::DatabasePoolInterface;
use pantry_service::ProductService;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub product_service: Arc<dyn ProductService>,
    /// Checked by the readiness probe when present.
    pub database: Option<Arc<dyn DatabasePoolInterface>>,
}

impl AppState {
    /// Creates a new application state.
    pub fn new(product_service: Arc<dyn ProductService>) -> Self {
        Self {
            product_service,
            database: None,
        }
    }

    /// Attaches the database pool used by the readiness probe.
    #[must_use]
    pub fn with_database(mut self, database: Arc<dyn DatabasePoolInterface>) -> Self {
        self.database = Some(database);
        self
    }
}
