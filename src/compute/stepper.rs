//! Fixed-step ODE integration.
//!
//! A run advances the state at uniform increments `dt` with no error control.
//! The observer sees the initial state and the state after every completed
//! step, never the intermediate stage evaluations.

use crate::schema::Stepper;

/// Steps within this fraction of `dt` of the horizon are still taken.
const STEP_TOLERANCE: f64 = 1e-9;

/// A system of ordinary differential equations.
///
/// `derivative` may be called several times per step and must depend only on
/// `(x, t)`; implementors may keep scratch buffers but no other memory.
pub trait OdeSystem {
    /// Length of the state vector.
    fn dimension(&self) -> usize;

    /// Write dx/dt at `(x, t)` into `dxdt`.
    fn derivative(&mut self, x: &[f64], dxdt: &mut [f64], t: f64);
}

/// Receives each completed step.
pub trait Observer {
    fn observe(&mut self, x: &[f64], t: f64);
}

impl<F: FnMut(&[f64], f64)> Observer for F {
    #[inline]
    fn observe(&mut self, x: &[f64], t: f64) {
        self(x, t)
    }
}

/// Number of whole steps of size `dt` that fit in `[t_start, t_end]`.
pub fn step_count(t_start: f64, t_end: f64, dt: f64) -> usize {
    let steps = (t_end - t_start) / dt + STEP_TOLERANCE;
    if steps.is_finite() && steps > 0.0 {
        steps.floor() as usize
    } else {
        0
    }
}

/// Fixed-step integrator with pre-allocated stage buffers.
pub struct FixedStepper {
    kind: Stepper,
    /// Stage derivatives (k1..k4 for RK4, only k1 for Euler).
    stages: Vec<Vec<f64>>,
    /// Trial state for intermediate stages.
    trial: Vec<f64>,
}

impl FixedStepper {
    /// Create a stepper for states of length `dimension`.
    pub fn new(kind: Stepper, dimension: usize) -> Self {
        Self {
            kind,
            stages: (0..kind.stages()).map(|_| vec![0.0; dimension]).collect(),
            trial: vec![0.0; dimension],
        }
    }

    pub fn kind(&self) -> Stepper {
        self.kind
    }

    /// Advance `x` from `t` to `t + dt` in place.
    pub fn do_step<S: OdeSystem + ?Sized>(
        &mut self,
        system: &mut S,
        x: &mut [f64],
        t: f64,
        dt: f64,
    ) {
        debug_assert_eq!(x.len(), self.trial.len());

        match self.kind {
            Stepper::Euler => {
                let k1 = &mut self.stages[0];
                system.derivative(x, k1, t);
                for (xi, &k) in x.iter_mut().zip(k1.iter()) {
                    *xi += dt * k;
                }
            }
            Stepper::Rk4 => {
                let half = 0.5 * dt;
                let [k1, k2, k3, k4] = &mut self.stages[..] else {
                    unreachable!("RK4 stepper allocates four stages");
                };
                let trial = &mut self.trial;

                system.derivative(x, k1, t);

                for ((s, &xi), &k) in trial.iter_mut().zip(x.iter()).zip(k1.iter()) {
                    *s = xi + half * k;
                }
                system.derivative(trial, k2, t + half);

                for ((s, &xi), &k) in trial.iter_mut().zip(x.iter()).zip(k2.iter()) {
                    *s = xi + half * k;
                }
                system.derivative(trial, k3, t + half);

                for ((s, &xi), &k) in trial.iter_mut().zip(x.iter()).zip(k3.iter()) {
                    *s = xi + dt * k;
                }
                system.derivative(trial, k4, t + dt);

                let sixth = dt / 6.0;
                for i in 0..x.len() {
                    x[i] += sixth * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
                }
            }
        }
    }
}

/// Integrate `system` from `t_start` to `t_end` with constant step `dt`.
///
/// Times are computed as `t_start + step * dt` so they do not drift.
/// Returns the number of observer calls (steps taken + 1).
pub fn integrate_const<S, O>(
    system: &mut S,
    stepper: &mut FixedStepper,
    x: &mut [f64],
    t_start: f64,
    t_end: f64,
    dt: f64,
    observer: &mut O,
) -> usize
where
    S: OdeSystem + ?Sized,
    O: Observer + ?Sized,
{
    let n_steps = step_count(t_start, t_end, dt);
    log::debug!(
        "Integrating {} states over [{}, {}] with {:?}: {} steps of {}",
        x.len(),
        t_start,
        t_end,
        stepper.kind(),
        n_steps,
        dt
    );

    for step in 0..n_steps {
        let t = t_start + step as f64 * dt;
        observer.observe(x, t);
        stepper.do_step(system, x, t, dt);
    }
    observer.observe(x, t_start + n_steps as f64 * dt);

    n_steps + 1
}
