//! Compute module - Numerical core of the pollinator models.

mod flower;
mod landscape;
mod models;
mod pulse;
mod stepper;
mod sweep;
mod table;
mod trajectory;
mod weights;

pub use flower::*;
pub use landscape::*;
pub use models::*;
pub use pulse::*;
pub use stepper::*;
pub use sweep::*;
pub use table::*;
pub use trajectory::*;
pub use weights::*;
