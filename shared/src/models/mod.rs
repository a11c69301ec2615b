//! Domain models for flood risk prediction

mod assessment;
mod observation;
mod weather;

pub use assessment::*;
pub use observation::*;
pub use weather::*;
