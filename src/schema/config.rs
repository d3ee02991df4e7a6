//! Run configuration: integration settings, initial conditions and scenarios.

use serde::{Deserialize, Serialize};

use super::{LandscapeParams, OnePlantParams, SeasonParams};

fn default_dt() -> f64 {
    0.1
}

fn default_max_t() -> f64 {
    90.0
}

fn default_flowers() -> f64 {
    1.0
}

/// Largest number of fixed steps a single run may take.
pub const MAX_STEPS: usize = 10_000_000;

/// Fixed-step scheme used to advance the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stepper {
    /// Classic four-stage Runge-Kutta.
    #[default]
    Rk4,
    /// Explicit Euler.
    Euler,
}

impl Stepper {
    /// Number of derivative evaluations per step.
    #[inline]
    pub fn stages(&self) -> usize {
        match self {
            Stepper::Rk4 => 4,
            Stepper::Euler => 1,
        }
    }
}

/// Time discretization of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Step size.
    #[serde(default = "default_dt")]
    pub dt: f64,
    /// End of the simulated horizon; the run starts at 0.
    #[serde(default = "default_max_t")]
    pub max_t: f64,
    #[serde(default)]
    pub stepper: Stepper,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            dt: default_dt(),
            max_t: default_max_t(),
            stepper: Stepper::default(),
        }
    }
}

impl IntegrationConfig {
    /// Number of recorded time points: the initial state plus one per step.
    pub fn expected_rows(&self) -> usize {
        crate::compute::step_count(0.0, self.max_t, self.dt).saturating_add(1)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.dt.is_finite() || self.dt <= 0.0 {
            return Err(ConfigError::InvalidTimeStep(self.dt));
        }
        if !self.max_t.is_finite() || self.max_t < 0.0 {
            return Err(ConfigError::InvalidHorizon(self.max_t));
        }
        let steps = self.max_t / self.dt;
        if !steps.is_finite() || steps > MAX_STEPS as f64 {
            return Err(ConfigError::TooManySteps {
                steps,
                limit: MAX_STEPS,
            });
        }
        Ok(())
    }
}

/// Initial palatable and defended proportions, one entry per plant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandscapeInitial {
    pub y0: Vec<f64>,
    pub b0: Vec<f64>,
}

impl Default for LandscapeInitial {
    fn default() -> Self {
        Self {
            y0: vec![0.5, 0.5],
            b0: vec![0.1, 0.1],
        }
    }
}

/// Initial flower counts for the single-plant models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowerInitial {
    #[serde(default = "default_flowers")]
    pub y0: f64,
    #[serde(default = "default_flowers")]
    pub b0: f64,
    #[serde(default = "default_flowers")]
    pub n0: f64,
}

impl Default for FlowerInitial {
    fn default() -> Self {
        Self {
            y0: default_flowers(),
            b0: default_flowers(),
            n0: default_flowers(),
        }
    }
}

impl FlowerInitial {
    #[inline]
    pub fn to_state(self) -> [f64; 3] {
        [self.y0, self.b0, self.n0]
    }
}

/// A complete, self-contained simulation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum Scenario {
    /// Landscape of plants with constant flower totals.
    Landscape {
        params: LandscapeParams,
        initial: LandscapeInitial,
        #[serde(default)]
        integration: IntegrationConfig,
    },
    /// Single plant with constant resource input.
    OnePlant {
        params: OnePlantParams,
        #[serde(default)]
        initial: FlowerInitial,
        #[serde(default)]
        integration: IntegrationConfig,
    },
    /// Single plant with a seasonal resource pulse.
    OnePlantSeason {
        params: SeasonParams,
        #[serde(default)]
        initial: FlowerInitial,
        #[serde(default)]
        integration: IntegrationConfig,
    },
}

impl Default for Scenario {
    fn default() -> Self {
        Scenario::Landscape {
            params: LandscapeParams::default(),
            initial: LandscapeInitial::default(),
            integration: IntegrationConfig::default(),
        }
    }
}

impl Scenario {
    /// Short model name, as used in the `model` tag.
    pub fn model_name(&self) -> &'static str {
        match self {
            Scenario::Landscape { .. } => "landscape",
            Scenario::OnePlant { .. } => "one_plant",
            Scenario::OnePlantSeason { .. } => "one_plant_season",
        }
    }

    pub fn integration(&self) -> &IntegrationConfig {
        match self {
            Scenario::Landscape { integration, .. }
            | Scenario::OnePlant { integration, .. }
            | Scenario::OnePlantSeason { integration, .. } => integration,
        }
    }

    /// Validate the scenario without running it.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.integration().validate()?;
        match self {
            Scenario::Landscape {
                params, initial, ..
            } => params.validate(&initial.y0, &initial.b0),
            Scenario::OnePlant { params, .. } => params.validate(),
            Scenario::OnePlantSeason { params, .. } => params.validate(),
        }
    }

    /// One example scenario per model.
    pub fn examples() -> Vec<Scenario> {
        vec![
            Scenario::default(),
            Scenario::OnePlant {
                params: OnePlantParams::default(),
                initial: FlowerInitial::default(),
                integration: IntegrationConfig::default(),
            },
            Scenario::OnePlantSeason {
                params: SeasonParams::default(),
                initial: FlowerInitial::default(),
                integration: IntegrationConfig::default(),
            },
        ]
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} is length {found}, expected {expected} (one entry per plant)")]
    LengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Landscape must contain at least one plant")]
    NoPlants,
    #[error("Time step must be positive and finite, got {0}")]
    InvalidTimeStep(f64),
    #[error("Horizon max_t must be non-negative and finite, got {0}")]
    InvalidHorizon(f64),
    #[error("Horizon needs {steps} steps, more than the limit of {limit}")]
    TooManySteps { steps: f64, limit: usize },
    #[error("Blend weight q must lie in [0, 1], got {0}")]
    InvalidBlend(f64),
    #[error("Weibull pulse {field} must be positive, got {value}")]
    InvalidPulse { field: &'static str, value: f64 },
}
