//! Shared types and models for the flood risk prediction service
//!
//! This crate holds the pieces used by both the backend and the browser
//! (via WASM): the observation and assessment models, input validation, the
//! scoring model and risk tier classification.

pub mod models;
pub mod scoring;
pub mod types;
pub mod validation;

pub use models::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
