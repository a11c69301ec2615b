//! HTTP handlers

mod geocoding;
mod health;
mod prediction;
mod weather;

pub use geocoding::*;
pub use health::*;
pub use prediction::*;
pub use weather::*;
