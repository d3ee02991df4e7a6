//! Biological rate constants for the landscape and single-plant models.
//!
//! All parameter sets are immutable for the duration of a run.

use serde::{Deserialize, Serialize};

use super::ConfigError;

/// Transition-rate constants for one plant.
///
/// Colonization (gamma) and within-patch dispersal (delta) each have a
/// baseline term and a pollinator-boosted term; mortality is linear decay
/// and never depends on pollinator visitation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransitionRates {
    /// Mortality rate.
    pub m: f64,
    /// Pollinator-boosted dispersal into the palatable state.
    pub d_yp: f64,
    /// Baseline dispersal into the defended state.
    pub d_b0: f64,
    /// Pollinator-boosted dispersal into the defended state.
    pub d_bp: f64,
    /// Pollinator-boosted colonization into the palatable state.
    pub g_yp: f64,
    /// Baseline colonization into the defended state.
    pub g_b0: f64,
    /// Pollinator-boosted colonization into the defended state.
    pub g_bp: f64,
    /// Half-saturation constant of the pollinator response.
    pub l_0: f64,
}

impl Default for TransitionRates {
    fn default() -> Self {
        Self {
            m: 0.1,
            d_yp: 0.5,
            d_b0: 0.1,
            d_bp: 0.2,
            g_yp: 0.3,
            g_b0: 0.05,
            g_bp: 0.1,
            l_0: 1.0,
        }
    }
}

/// Parameters for the landscape of plants with constant flower totals.
///
/// Every `Vec` holds one entry per plant and all must share the length of `m`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeParams {
    pub m: Vec<f64>,
    pub d_yp: Vec<f64>,
    pub d_b0: Vec<f64>,
    pub d_bp: Vec<f64>,
    pub g_yp: Vec<f64>,
    pub g_b0: Vec<f64>,
    pub g_bp: Vec<f64>,
    pub l_0: Vec<f64>,
    /// Preference exponent for low-defense plants (0 = uniform allocation).
    pub u: f64,
    /// Baseline pollinator attention not captured by any plant.
    pub x: f64,
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self::uniform(TransitionRates::default(), 2, 1.0, 0.5)
    }
}

impl LandscapeParams {
    /// Build a landscape where every plant shares the same rates.
    pub fn uniform(rates: TransitionRates, n_plants: usize, u: f64, x: f64) -> Self {
        Self {
            m: vec![rates.m; n_plants],
            d_yp: vec![rates.d_yp; n_plants],
            d_b0: vec![rates.d_b0; n_plants],
            d_bp: vec![rates.d_bp; n_plants],
            g_yp: vec![rates.g_yp; n_plants],
            g_b0: vec![rates.g_b0; n_plants],
            g_bp: vec![rates.g_bp; n_plants],
            l_0: vec![rates.l_0; n_plants],
            u,
            x,
        }
    }

    /// Number of plants, taken from the mortality array.
    #[inline]
    pub fn n_plants(&self) -> usize {
        self.m.len()
    }

    /// Rates of plant `i`.
    ///
    /// Panics if `i` is out of range or the parameters were not validated.
    pub fn plant(&self, i: usize) -> TransitionRates {
        TransitionRates {
            m: self.m[i],
            d_yp: self.d_yp[i],
            d_b0: self.d_b0[i],
            d_bp: self.d_bp[i],
            g_yp: self.g_yp[i],
            g_b0: self.g_b0[i],
            g_bp: self.g_bp[i],
            l_0: self.l_0[i],
        }
    }

    /// Check that every per-plant array (including initial conditions) has
    /// one entry per plant.
    ///
    /// Every offending array is logged; the first one is returned.
    pub fn validate(&self, y0: &[f64], b0: &[f64]) -> Result<(), ConfigError> {
        let np = self.n_plants();
        if np == 0 {
            return Err(ConfigError::NoPlants);
        }

        let fields: [(&'static str, usize); 9] = [
            ("d_yp", self.d_yp.len()),
            ("d_b0", self.d_b0.len()),
            ("d_bp", self.d_bp.len()),
            ("g_yp", self.g_yp.len()),
            ("g_b0", self.g_b0.len()),
            ("g_bp", self.g_bp.len()),
            ("L_0", self.l_0.len()),
            ("Y0", y0.len()),
            ("B0", b0.len()),
        ];

        let mut first = None;
        for (field, found) in fields {
            if found != np {
                log::warn!("{field} is length {found}, expected {np} (length of m)");
                first.get_or_insert(ConfigError::LengthMismatch {
                    field,
                    expected: np,
                    found,
                });
            }
        }

        match first {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

/// Pollinator capacity and response-shape parameters for single-plant models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PollinatorParams {
    /// Maximum pollinator visitation.
    pub p_max: f64,
    /// Weight of the defense-ratio signal (psi) against flower abundance (phi).
    pub q: f64,
    /// Half-point of psi in B/F.
    pub s_0: f64,
    /// Shape of psi.
    pub h: f64,
    /// Half-point of phi.
    pub f_0: f64,
    /// Abundance rescaling: phi sees F / (F + f_tilde).
    pub f_tilde: f64,
    /// Shape of phi.
    pub u: f64,
}

impl Default for PollinatorParams {
    fn default() -> Self {
        Self {
            p_max: 1.0,
            q: 0.5,
            s_0: 0.5,
            h: 2.0,
            f_0: 0.5,
            f_tilde: 1.0,
            u: 2.0,
        }
    }
}

impl PollinatorParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.q) {
            return Err(ConfigError::InvalidBlend(self.q));
        }
        Ok(())
    }
}

/// Weibull-shaped seasonal resource pulse.
///
/// R(t) = r_hat * (k / lambda) * ((t + t0) / lambda)^(k - 1) * exp(-((t + t0) / lambda)^k)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeibullPulse {
    /// Total mass of the pulse over [-t0, inf).
    pub r_hat: f64,
    /// Time offset: simulation time 0 corresponds to t0 on the pulse.
    pub t0: f64,
    /// Weibull shape.
    pub k: f64,
    /// Weibull scale.
    pub lambda: f64,
}

impl Default for WeibullPulse {
    fn default() -> Self {
        Self {
            r_hat: 10.0,
            t0: 0.0,
            k: 2.0,
            lambda: 30.0,
        }
    }
}

impl WeibullPulse {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k.is_nan() || self.k <= 0.0 {
            return Err(ConfigError::InvalidPulse { field: "k", value: self.k });
        }
        if self.lambda.is_nan() || self.lambda <= 0.0 {
            return Err(ConfigError::InvalidPulse {
                field: "lambda",
                value: self.lambda,
            });
        }
        Ok(())
    }
}

/// Single plant with a constant resource input rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OnePlantParams {
    #[serde(flatten)]
    pub rates: TransitionRates,
    /// Constant input rate of unoccupied flowers.
    pub r: f64,
    #[serde(flatten)]
    pub pollinator: PollinatorParams,
}

impl Default for OnePlantParams {
    fn default() -> Self {
        Self {
            rates: TransitionRates::default(),
            r: 0.5,
            pollinator: PollinatorParams::default(),
        }
    }
}

impl OnePlantParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pollinator.validate()
    }
}

/// Single plant whose resource input follows a seasonal Weibull pulse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct SeasonParams {
    #[serde(flatten)]
    pub rates: TransitionRates,
    #[serde(flatten)]
    pub pollinator: PollinatorParams,
    #[serde(flatten)]
    pub pulse: WeibullPulse,
}

impl SeasonParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pollinator.validate()?;
        self.pulse.validate()
    }
}
