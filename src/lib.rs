//! Pollinator ODE - Plant patch dynamics driven by a shared pollinator pool.
//!
//! Plant patches move between palatable (Y), defended (B) and unoccupied (N)
//! states. Transition rates depend on how much pollinator visitation a plant
//! receives, and visitation is a finite resource redistributed at every
//! derivative evaluation based on relative attractiveness.
//!
//! # Architecture
//!
//! The crate is split into two main modules:
//!
//! - `schema`: Parameter sets, run configuration and scenarios
//! - `compute`: Numerical computation (weights, derivative systems,
//!   fixed-step integration, output tables, sweeps)
//!
//! # Models
//!
//! - [`landscape_constant_f_ode`]: many plants with constant flower totals,
//!   coupled through normalized pollination weights
//! - [`one_plant_ode`]: one plant with absolute flower counts and a constant
//!   resource input
//! - [`one_plant_season_ode`]: as above with a seasonal Weibull pulse
//!
//! # Example
//!
//! ```rust,no_run
//! use pollinator_ode::{
//!     compute::landscape_constant_f_ode,
//!     schema::{IntegrationConfig, LandscapeInitial, LandscapeParams},
//! };
//!
//! let params = LandscapeParams::default();
//! let initial = LandscapeInitial {
//!     y0: vec![0.5, 0.5],
//!     b0: vec![0.1, 0.1],
//! };
//! let integration = IntegrationConfig {
//!     max_t: 1.0,
//!     ..Default::default()
//! };
//!
//! let table = landscape_constant_f_ode(&params, &initial, &integration)?;
//! println!("{} rows, columns {:?}", table.n_rows(), table.columns());
//! # Ok::<(), pollinator_ode::schema::ConfigError>(())
//! ```

pub mod compute;
pub mod schema;

// Re-export commonly used types
pub use compute::{
    Table, TableSummary, landscape_constant_f_ode, one_plant_ode, one_plant_season_ode,
    run_scenario, run_sweep,
};
pub use schema::{ConfigError, IntegrationConfig, Scenario};
