//! Single-plant models with absolute flower counts.
//!
//! State is `[Y, B, N]` and the total `F = Y + B + N` changes over time.
//! Pollinator visitation blends a flower-abundance signal (phi) with a
//! defense-ratio signal (psi). The constant-input and seasonal variants
//! differ only in the resource input rate `R(t)` of unoccupied flowers.

use crate::schema::{OnePlantParams, PollinatorParams, SeasonParams, TransitionRates, WeibullPulse};

use super::{ConstantInput, OdeSystem, ResourceInput, saturation};

/// Number of state variables (Y, B, N).
pub const FLOWER_STATES: usize = 3;

/// Pollinator visitation intensity as a function of flower counts.
///
/// Powers of the half-points are computed once per run.
#[derive(Debug, Clone, Copy)]
pub struct PollinatorResponse {
    p_max: f64,
    q: f64,
    h: f64,
    u: f64,
    f_tilde: f64,
    s_0_h: f64,
    f_0_u: f64,
}

impl PollinatorResponse {
    pub fn new(params: &PollinatorParams) -> Self {
        Self {
            p_max: params.p_max,
            q: params.q,
            h: params.h,
            u: params.u,
            f_tilde: params.f_tilde,
            s_0_h: params.s_0.powf(params.h),
            f_0_u: params.f_0.powf(params.u),
        }
    }

    /// Flower-abundance signal, saturating in `F / (F + F_tilde)`.
    #[inline]
    pub fn phi(&self, f: f64) -> f64 {
        let ff_u = (f / (f + self.f_tilde)).powf(self.u);
        ff_u / (self.f_0_u + ff_u)
    }

    /// Defense-ratio signal, decreasing in `B / F`.
    #[inline]
    pub fn psi(&self, b: f64, f: f64) -> f64 {
        self.s_0_h / (self.s_0_h + (b / f).powf(self.h))
    }

    /// Visitation intensity `P` for a flower state.
    #[inline]
    pub fn intensity(&self, y: f64, b: f64, n: f64) -> f64 {
        let f = y + b + n;
        self.intensity_with_total(b, f)
    }

    #[inline]
    fn intensity_with_total(&self, b: f64, f: f64) -> f64 {
        self.p_max * (self.q * self.psi(b, f) + (1.0 - self.q) * self.phi(f))
    }
}

/// Derivative function of a single plant with resource input `I`.
#[derive(Debug, Clone)]
pub struct FlowerSystem<I> {
    rates: TransitionRates,
    response: PollinatorResponse,
    input: I,
}

/// Single plant with constant resource input.
pub type OnePlantSystem = FlowerSystem<ConstantInput>;

/// Single plant with a seasonal Weibull resource pulse.
pub type SeasonSystem = FlowerSystem<WeibullPulse>;

impl<I: ResourceInput> FlowerSystem<I> {
    pub fn new(rates: TransitionRates, pollinator: &PollinatorParams, input: I) -> Self {
        Self {
            rates,
            response: PollinatorResponse::new(pollinator),
            input,
        }
    }

    pub fn response(&self) -> &PollinatorResponse {
        &self.response
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    /// Rates of change at `[Y, B, N]` and time `t`.
    pub fn rates_of_change(&self, state: [f64; FLOWER_STATES], t: f64) -> [f64; FLOWER_STATES] {
        let [y, b, n] = state;
        let rates = &self.rates;
        let f = y + b + n;

        let p = self.response.intensity_with_total(b, f);
        let lambda = saturation(p / f, rates.l_0);

        let gamma_y = rates.g_yp * lambda;
        let gamma_b = rates.g_b0 + rates.g_bp * lambda;

        let delta_y = rates.d_yp * lambda;
        let delta_b = rates.d_b0 + rates.d_bp * lambda;

        let disp_y = delta_y * y / f + gamma_y;
        let disp_b = delta_b * b / f + gamma_b;

        [
            disp_y * n - rates.m * y,
            disp_b * n - rates.m * b,
            self.input.rate(t) - n * (rates.m + disp_y + disp_b),
        ]
    }
}

impl OnePlantSystem {
    pub fn from_params(params: &OnePlantParams) -> Self {
        Self::new(params.rates, &params.pollinator, ConstantInput(params.r))
    }
}

impl SeasonSystem {
    pub fn from_params(params: &SeasonParams) -> Self {
        Self::new(params.rates, &params.pollinator, params.pulse)
    }
}

impl<I: ResourceInput> OdeSystem for FlowerSystem<I> {
    fn dimension(&self) -> usize {
        FLOWER_STATES
    }

    fn derivative(&mut self, x: &[f64], dxdt: &mut [f64], t: f64) {
        let d = self.rates_of_change([x[0], x[1], x[2]], t);
        dxdt[..FLOWER_STATES].copy_from_slice(&d);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_response_half_points() {
        let params = PollinatorParams {
            p_max: 2.0,
            q: 1.0,
            s_0: 0.25,
            h: 3.0,
            ..Default::default()
        };
        let response = PollinatorResponse::new(&params);
        // B / F == s_0 gives psi = 1/2.
        assert!((response.psi(1.0, 4.0) - 0.5).abs() < 1e-12);
        assert!((response.intensity(1.0, 1.0, 2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_phi_rescaled_by_f_tilde() {
        let params = PollinatorParams {
            f_0: 0.5,
            f_tilde: 3.0,
            u: 1.0,
            ..Default::default()
        };
        let response = PollinatorResponse::new(&params);
        // F / (F + F_tilde) == f_0 gives phi = 1/2.
        assert!((response.phi(3.0) - 0.5).abs() < 1e-12);
        assert!(response.phi(30.0) > response.phi(3.0));
    }

    #[test]
    fn test_defense_lowers_intensity() {
        let response = PollinatorResponse::new(&PollinatorParams::default());
        assert!(response.intensity(2.0, 0.5, 1.0) > response.intensity(0.5, 2.0, 1.0));
    }

    #[test]
    fn test_season_uses_time() {
        let mut system = SeasonSystem::from_params(&SeasonParams::default());
        let x = [1.0, 1.0, 1.0];
        let mut early = [0.0; 3];
        let mut peak = [0.0; 3];
        system.derivative(&x, &mut early, 0.0);
        system.derivative(&x, &mut peak, SeasonParams::default().pulse.peak_time());

        assert_eq!(early[0], peak[0]);
        assert_eq!(early[1], peak[1]);
        assert!(peak[2] > early[2]);
    }

    #[test]
    fn test_zero_flowers_propagates_nan() {
        let system = OnePlantSystem::from_params(&OnePlantParams::default());
        let d = system.rates_of_change([0.0, 0.0, 0.0], 0.0);
        assert!(d.iter().all(|v| v.is_nan()));
    }

    proptest! {
        #[test]
        fn prop_total_flux_identity(
            y in 0.01f64..10.0,
            b in 0.01f64..10.0,
            n in 0.01f64..10.0,
            r in 0.0f64..5.0,
            m in 0.0f64..1.0,
            d_yp in 0.0f64..2.0,
            d_b0 in 0.0f64..2.0,
            g_yp in 0.0f64..2.0,
            g_b0 in 0.0f64..2.0,
            q in 0.0f64..=1.0,
        ) {
            let params = OnePlantParams {
                rates: TransitionRates { m, d_yp, d_b0, g_yp, g_b0, ..Default::default() },
                r,
                pollinator: PollinatorParams { q, ..Default::default() },
            };
            let system = OnePlantSystem::from_params(&params);
            let [dy, db, dn] = system.rates_of_change([y, b, n], 0.0);

            let expected = r - m * (y + b + n);
            let scale = 1.0 + expected.abs() + (dy.abs() + db.abs() + dn.abs());
            prop_assert!((dy + db + dn - expected).abs() < 1e-10 * scale);
        }
    }
}
