//! # Pantry Core
//!
//! Core types, domain model, and error definitions for the Pantry product
//! catalog. Every other layer of the workspace builds on the abstractions
//! defined here.

pub mod domain;
pub mod error;
pub mod id;
pub mod pagination;
pub mod result;
pub mod telemetry;
pub mod validation;

pub use domain::*;
pub use error::*;
pub use id::*;
pub use pagination::*;
pub use result::*;
pub use validation::*;

// Re-export shaku for dependency injection
pub use shaku::Interface;
