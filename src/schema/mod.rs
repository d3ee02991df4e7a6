//! Schema module - Parameter sets, run configuration and scenarios.

mod config;
mod params;

pub use config::*;
pub use params::*;
