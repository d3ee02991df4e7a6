//! Parameter sweeps over independent scenarios.
//!
//! Every scenario gets its own system instance and scratch buffers, so runs
//! share nothing and can execute in parallel.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::schema::{ConfigError, Scenario};

use super::{Table, run_scenario};

/// Run every scenario, returning results in input order.
///
/// Native: scenarios run in parallel on the rayon thread pool.
/// WASM: scenarios run sequentially.
pub fn run_sweep(scenarios: &[Scenario]) -> Vec<Result<Table, ConfigError>> {
    log::debug!("Running sweep of {} scenarios", scenarios.len());

    #[cfg(not(target_arch = "wasm32"))]
    let results: Vec<Result<Table, ConfigError>> = scenarios.par_iter().map(run_scenario).collect();

    #[cfg(target_arch = "wasm32")]
    let results: Vec<Result<Table, ConfigError>> = scenarios.iter().map(run_scenario).collect();

    let failed = results.iter().filter(|r| r.is_err()).count();
    if failed > 0 {
        log::warn!("{} of {} sweep scenarios failed validation", failed, scenarios.len());
    }

    results
}

/// One copy of `base` per value of the preference exponent `u`.
///
/// For the landscape model `u` is the preference for low-defense plants; for
/// the single-plant models it is the shape of the flower-abundance signal.
pub fn preference_sweep(base: &Scenario, values: &[f64]) -> Vec<Scenario> {
    values
        .iter()
        .map(|&u| {
            let mut scenario = base.clone();
            match &mut scenario {
                Scenario::Landscape { params, .. } => params.u = u,
                Scenario::OnePlant { params, .. } => params.pollinator.u = u,
                Scenario::OnePlantSeason { params, .. } => params.pollinator.u = u,
            }
            scenario
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{IntegrationConfig, LandscapeInitial, LandscapeParams};

    fn base() -> Scenario {
        Scenario::Landscape {
            params: LandscapeParams::default(),
            initial: LandscapeInitial {
                y0: vec![0.4, 0.2],
                b0: vec![0.1, 0.5],
            },
            integration: IntegrationConfig {
                max_t: 5.0,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_sweep_matches_sequential_runs() {
        let scenarios = preference_sweep(&base(), &[0.0, 0.5, 1.0, 2.0, 4.0]);
        let results = run_sweep(&scenarios);

        assert_eq!(results.len(), scenarios.len());
        for (scenario, result) in scenarios.iter().zip(&results) {
            assert_eq!(result.as_ref().unwrap(), &run_scenario(scenario).unwrap());
        }
    }

    #[test]
    fn test_sweep_keeps_failures_in_place() {
        let mut broken = base();
        if let Scenario::Landscape { initial, .. } = &mut broken {
            initial.b0.pop();
        }
        let results = run_sweep(&[base(), broken, base()]);

        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(ConfigError::LengthMismatch { field: "B0", .. })));
        assert!(results[2].is_ok());
    }

    #[test]
    fn test_stronger_preference_favors_palatable_plant() {
        let scenarios = preference_sweep(&base(), &[0.0, 3.0]);
        let results = run_sweep(&scenarios);
        let uniform = results[0].as_ref().unwrap();
        let strong = results[1].as_ref().unwrap();

        // Plant 0 is less defended, so a stronger preference raises its share.
        assert!(strong.get(0, "P").unwrap() > uniform.get(0, "P").unwrap());
        assert!(strong.get(1, "P").unwrap() < uniform.get(1, "P").unwrap());
    }
}
