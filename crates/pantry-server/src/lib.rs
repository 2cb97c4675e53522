//! # Pantry Server Library
//!
//! Wiring and startup for the Pantry catalog server.

pub mod app;
pub mod di;
pub mod startup;

pub use app::Application;
