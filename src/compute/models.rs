//! Simulation entry points.
//!
//! Each entry point validates its inputs before integrating, runs a fresh
//! system instance from `t = 0` to `max_t`, and formats the recorded
//! trajectory into a [`Table`]. Configuration errors are returned, never
//! panicked on.

use crate::schema::{
    ConfigError, FlowerInitial, IntegrationConfig, LandscapeInitial, LandscapeParams,
    OnePlantParams, Scenario, SeasonParams,
};

use super::{
    FixedStepper, FlowerSystem, LandscapeSystem, OdeSystem, OnePlantSystem, ResourceInput,
    SeasonSystem, Table, Trajectory, flower_table, integrate_const, landscape_table,
};

/// Integrate `system` from `x0` and record every step.
fn record<S: OdeSystem>(
    system: &mut S,
    x0: Vec<f64>,
    integration: &IntegrationConfig,
) -> Trajectory {
    let mut x = x0;
    let mut stepper = FixedStepper::new(integration.stepper, system.dimension());
    let mut trajectory = Trajectory::with_capacity(system.dimension(), integration.expected_rows());

    integrate_const(
        system,
        &mut stepper,
        &mut x,
        0.0,
        integration.max_t,
        integration.dt,
        &mut trajectory,
    );

    let non_finite = trajectory.non_finite_count();
    if non_finite > 0 {
        log::warn!(
            "Trajectory contains {} non-finite values out of {}",
            non_finite,
            trajectory.len() * trajectory.dimension()
        );
    }

    trajectory
}

fn reject<T>(model: &str, err: ConfigError) -> Result<T, ConfigError> {
    log::warn!("{model}: invalid configuration: {err}");
    Err(err)
}

/// Landscape of plants with constant flower totals.
///
/// Returns a table with columns `t, p, Y, B, P`, one row per recorded time
/// and plant. Mismatched per-plant array lengths are reported as
/// [`ConfigError::LengthMismatch`] before any integration happens.
pub fn landscape_constant_f_ode(
    params: &LandscapeParams,
    initial: &LandscapeInitial,
    integration: &IntegrationConfig,
) -> Result<Table, ConfigError> {
    if let Err(err) = integration
        .validate()
        .and_then(|_| params.validate(&initial.y0, &initial.b0))
    {
        return reject("landscape", err);
    }

    let mut system = LandscapeSystem::new(params.clone());
    let x0 = LandscapeSystem::initial_state(&initial.y0, &initial.b0);
    let trajectory = record(&mut system, x0, integration);

    Ok(landscape_table(&trajectory, &system))
}

fn run_flower<I: ResourceInput>(
    mut system: FlowerSystem<I>,
    initial: &FlowerInitial,
    integration: &IntegrationConfig,
) -> Table {
    let trajectory = record(&mut system, initial.to_state().to_vec(), integration);
    flower_table(&trajectory, system.response())
}

/// Single plant with constant resource input `R`.
///
/// Returns a table with columns `t, Y, B, N, P`, one row per recorded time.
/// `P` is recomputed with the same `F / (F + F_tilde)` abundance signal the
/// derivative uses, so it differs from tables that report the un-rescaled
/// `F^u / (f_0^u + F^u)` signal.
pub fn one_plant_ode(
    params: &OnePlantParams,
    initial: &FlowerInitial,
    integration: &IntegrationConfig,
) -> Result<Table, ConfigError> {
    if let Err(err) = integration.validate().and_then(|_| params.validate()) {
        return reject("one_plant", err);
    }

    Ok(run_flower(OnePlantSystem::from_params(params), initial, integration))
}

/// Single plant with a seasonal Weibull resource pulse.
///
/// Returns a table with columns `t, Y, B, N, P`, one row per recorded time.
pub fn one_plant_season_ode(
    params: &SeasonParams,
    initial: &FlowerInitial,
    integration: &IntegrationConfig,
) -> Result<Table, ConfigError> {
    if let Err(err) = integration.validate().and_then(|_| params.validate()) {
        return reject("one_plant_season", err);
    }

    Ok(run_flower(SeasonSystem::from_params(params), initial, integration))
}

/// Run any scenario.
pub fn run_scenario(scenario: &Scenario) -> Result<Table, ConfigError> {
    match scenario {
        Scenario::Landscape {
            params,
            initial,
            integration,
        } => landscape_constant_f_ode(params, initial, integration),
        Scenario::OnePlant {
            params,
            initial,
            integration,
        } => one_plant_ode(params, initial, integration),
        Scenario::OnePlantSeason {
            params,
            initial,
            integration,
        } => one_plant_season_ode(params, initial, integration),
    }
}
