//! Landscape of plants with a constant number of flowers per plant.
//!
//! Y and B are proportions of each plant's flowers; the unoccupied fraction
//! is `N = 1 - Y - B`. Plants are coupled only through the shared pollination
//! weights.

use crate::schema::{LandscapeParams, TransitionRates};

use super::{OdeSystem, pollination_weights_into, saturation};

/// Number of state variables per plant (Y, B).
pub const LANDSCAPE_STATES: usize = 2;

/// Derivative function of the landscape model.
///
/// Owns a weight buffer that is reused across derivative calls within a
/// single run. Create one instance per run.
pub struct LandscapeSystem {
    params: LandscapeParams,
    /// Scratch buffer for pollination weights.
    weights: Vec<f64>,
}

impl LandscapeSystem {
    /// Create the system. `params` must already be validated.
    pub fn new(params: LandscapeParams) -> Self {
        let n_plants = params.n_plants();
        Self {
            params,
            weights: vec![0.0; n_plants],
        }
    }

    #[inline]
    pub fn n_plants(&self) -> usize {
        self.params.n_plants()
    }

    pub fn params(&self) -> &LandscapeParams {
        &self.params
    }

    /// Pollination weights of a snapshot, written into `out`.
    pub fn weights_for(&self, state: &[f64], out: &mut Vec<f64>) {
        pollination_weights_into(state, self.params.u, self.params.x, out);
    }

    /// Pack initial proportions into the row-major state matrix.
    pub fn initial_state(y0: &[f64], b0: &[f64]) -> Vec<f64> {
        y0.iter().zip(b0).flat_map(|(&y, &b)| [y, b]).collect()
    }
}

/// Rates of change of one plant given its pollination weight `p`.
#[inline]
fn plant_derivative(rates: &TransitionRates, y: f64, b: f64, p: f64) -> (f64, f64) {
    let n = 1.0 - y - b;
    let lambda = saturation(p, rates.l_0);

    let gamma_y = rates.g_yp * lambda;
    let gamma_b = rates.g_b0 + rates.g_bp * lambda;

    let delta_y = rates.d_yp * lambda;
    let delta_b = rates.d_b0 + rates.d_bp * lambda;

    let disp_y = delta_y * y + gamma_y;
    let disp_b = delta_b * b + gamma_b;

    (disp_y * n - rates.m * y, disp_b * n - rates.m * b)
}

impl OdeSystem for LandscapeSystem {
    fn dimension(&self) -> usize {
        self.n_plants() * LANDSCAPE_STATES
    }

    fn derivative(&mut self, x: &[f64], dxdt: &mut [f64], _t: f64) {
        pollination_weights_into(x, self.params.u, self.params.x, &mut self.weights);

        for (i, (plant, d)) in x
            .chunks_exact(LANDSCAPE_STATES)
            .zip(dxdt.chunks_exact_mut(LANDSCAPE_STATES))
            .enumerate()
        {
            let rates = self.params.plant(i);
            let (dy, db) = plant_derivative(&rates, plant[0], plant[1], self.weights[i]);
            d[0] = dy;
            d[1] = db;
        }
    }
}
