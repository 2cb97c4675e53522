//! # Pantry Repository
//!
//! Store gateway for products:
//!
//! ```text
//! Service
//!   ↓  Arc<dyn ProductRepository>     (store interface)
//! PostgresProductRepository          (SQLx)
//!   ↓  Arc<dyn DatabasePoolInterface>
//! PostgreSQL
//! ```
//!
//! [`InMemoryProductRepository`] implements the same contract without a
//! database.

pub mod memory;
pub mod pool;
pub mod postgres;
pub mod seed;
pub mod traits;

pub use memory::InMemoryProductRepository;
pub use pool::*;
pub use postgres::*;
pub use seed::*;
pub use traits::*;
