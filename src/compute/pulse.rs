//! Resource input for the single-plant models.
//!
//! The base model receives unoccupied flowers at a constant rate; the seasonal
//! model receives them as a Weibull-shaped pulse that peaks once per season.

use crate::schema::WeibullPulse;

/// Time-dependent input rate of unoccupied flowers.
pub trait ResourceInput {
    fn rate(&self, t: f64) -> f64;
}

/// Constant input rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantInput(pub f64);

impl ResourceInput for ConstantInput {
    #[inline]
    fn rate(&self, _t: f64) -> f64 {
        self.0
    }
}

impl ResourceInput for WeibullPulse {
    #[inline]
    fn rate(&self, t: f64) -> f64 {
        let z = (t + self.t0) / self.lambda;
        self.r_hat * (self.k / self.lambda) * z.powf(self.k - 1.0) * (-z.powf(self.k)).exp()
    }
}

impl WeibullPulse {
    /// Simulation time at which the input rate peaks.
    ///
    /// For `k <= 1` the rate only decays, so the peak is at the start of the
    /// pulse (`-t0`).
    pub fn peak_time(&self) -> f64 {
        if self.k > 1.0 {
            self.lambda * ((self.k - 1.0) / self.k).powf(1.0 / self.k) - self.t0
        } else {
            -self.t0
        }
    }

    /// Mass delivered over `[0, t]` in simulation time.
    pub fn cumulative(&self, t: f64) -> f64 {
        let survival = |s: f64| (-((s + self.t0) / self.lambda).powf(self.k)).exp();
        self.r_hat * (survival(0.0) - survival(t))
    }
}

/// Composite trapezoid rule over `[a, b]` with `n` intervals.
pub fn trapezoid<F: Fn(f64) -> f64>(f: F, a: f64, b: f64, n: usize) -> f64 {
    let n = n.max(1);
    let h = (b - a) / n as f64;
    let interior: f64 = (1..n).map(|i| f(a + i as f64 * h)).sum();
    h * (0.5 * (f(a) + f(b)) + interior)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_input() {
        let input = ConstantInput(0.7);
        assert_eq!(input.rate(0.0), 0.7);
        assert_eq!(input.rate(123.0), 0.7);
    }

    #[test]
    fn test_pulse_total_mass() {
        let pulse = WeibullPulse {
            r_hat: 10.0,
            t0: 0.0,
            k: 2.0,
            lambda: 30.0,
        };
        let total = trapezoid(|t| pulse.rate(t), 0.0, 600.0, 60_000);
        assert!((total - 10.0).abs() < 1e-4, "total mass {}", total);
    }

    #[test]
    fn test_pulse_total_mass_with_offset() {
        // Starting t0 into the season skips the mass already delivered.
        let pulse = WeibullPulse {
            r_hat: 4.0,
            t0: 15.0,
            k: 3.0,
            lambda: 40.0,
        };
        let total = trapezoid(|t| pulse.rate(t), 0.0, 400.0, 40_000);
        let expected = 4.0 * (-(15.0f64 / 40.0).powi(3)).exp();
        assert!((total - expected).abs() < 1e-4);
        assert!((pulse.cumulative(400.0) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_cumulative_matches_quadrature() {
        let pulse = WeibullPulse::default();
        let numeric = trapezoid(|t| pulse.rate(t), 0.0, 45.0, 10_000);
        assert!((pulse.cumulative(45.0) - numeric).abs() < 1e-5);
    }

    #[test]
    fn test_peak_time() {
        let pulse = WeibullPulse::default();
        let peak = pulse.peak_time();
        // k = 2: mode = lambda / sqrt(2)
        assert!((peak - 30.0 / 2.0f64.sqrt()).abs() < 1e-12);
        assert!(pulse.rate(peak) > pulse.rate(peak - 1.0));
        assert!(pulse.rate(peak) > pulse.rate(peak + 1.0));
    }

    #[test]
    fn test_trapezoid_linear_exact() {
        let area = trapezoid(|x| 2.0 * x + 1.0, 0.0, 3.0, 7);
        assert!((area - 12.0).abs() < 1e-12);
    }
}
