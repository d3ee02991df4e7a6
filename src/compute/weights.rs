//! Pollination weights for the landscape model.
//!
//! Pollinator attention is a finite resource shared across all plants. Each
//! plant's raw attractiveness is `(1 - B_i)^u`, and weights are normalized by
//! `X + sum(raw)`, where `X` is attention not captured by any plant. A rise in
//! one plant's attractiveness therefore lowers every other plant's weight.

/// Compute weights for every plant into `out`.
///
/// `state` is the row-major `n_plants x 2` matrix of `(Y_i, B_i)`. All weights
/// come from the same snapshot. `out` is resized if its length differs.
pub fn pollination_weights_into(state: &[f64], u: f64, x: f64, out: &mut Vec<f64>) {
    let n_plants = state.len() / 2;
    if out.len() != n_plants {
        out.resize(n_plants, 0.0);
    }

    let mut wt_sum = 0.0;
    for (w, plant) in out.iter_mut().zip(state.chunks_exact(2)) {
        // Palatable nectar: only the defended fraction reduces attractiveness.
        let yn = 1.0 - plant[1];
        *w = yn.powf(u);
        wt_sum += *w;
    }

    let norm = x + wt_sum;
    for w in out.iter_mut() {
        *w /= norm;
    }
}

/// Allocating variant of [`pollination_weights_into`].
pub fn pollination_weights(state: &[f64], u: f64, x: f64) -> Vec<f64> {
    let mut out = Vec::with_capacity(state.len() / 2);
    pollination_weights_into(state, u, x, &mut out);
    out
}

/// Saturating pollinator response: `P / (L_0 + P)`.
#[inline]
pub fn saturation(p: f64, l_0: f64) -> f64 {
    p / (l_0 + p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn landscape(b: &[f64]) -> Vec<f64> {
        b.iter().flat_map(|&bi| [0.3, bi]).collect()
    }

    #[test]
    fn test_uniform_when_u_zero() {
        let state = landscape(&[0.0, 0.4, 0.9]);
        let w = pollination_weights(&state, 0.0, 0.5);
        for wi in &w {
            assert!((wi - 1.0 / 3.5).abs() < 1e-12);
        }
    }

    #[test]
    fn test_weights_sum_to_one_without_baseline() {
        let state = landscape(&[0.1, 0.5, 0.2, 0.7]);
        let w = pollination_weights(&state, 2.0, 0.0);
        let total: f64 = w.iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_known_values() {
        // raw = [0.9, 0.5], sum = 1.4, norm = 1.9
        let state = landscape(&[0.1, 0.5]);
        let w = pollination_weights(&state, 1.0, 0.5);
        assert!((w[0] - 0.9 / 1.9).abs() < 1e-12);
        assert!((w[1] - 0.5 / 1.9).abs() < 1e-12);
    }

    #[test]
    fn test_palatable_fraction_ignored() {
        // Only B enters the weight.
        let a = pollination_weights(&[0.1, 0.2, 0.6, 0.3], 1.5, 0.2);
        let b = pollination_weights(&[0.7, 0.2, 0.0, 0.3], 1.5, 0.2);
        assert_eq!(a, b);
    }

    #[test]
    fn test_buffer_resized() {
        let mut out = vec![9.0; 5];
        pollination_weights_into(&landscape(&[0.1, 0.2]), 1.0, 0.5, &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(saturation(1.0, 1.0), 0.5);
        assert_eq!(saturation(0.0, 1.0), 0.0);
    }

    proptest! {
        #[test]
        fn prop_weights_bounded(
            b in prop::collection::vec(0.0f64..0.99, 1..8),
            u in 0.0f64..4.0,
            x in 0.01f64..2.0,
        ) {
            let w = pollination_weights(&landscape(&b), u, x);
            let total: f64 = w.iter().sum();
            for wi in &w {
                prop_assert!(*wi > 0.0 && *wi < 1.0);
            }
            prop_assert!(total < 1.0);
        }

        #[test]
        fn prop_mass_conserved_without_baseline(
            b in prop::collection::vec(0.0f64..0.99, 1..8),
            u in 0.0f64..4.0,
        ) {
            let w = pollination_weights(&landscape(&b), u, 0.0);
            let total: f64 = w.iter().sum();
            prop_assert!((total - 1.0).abs() < 1e-9);
        }

        #[test]
        fn prop_defense_reallocates_attention(
            b in prop::collection::vec(0.0f64..0.5, 2..8),
            bump in 0.05f64..0.4,
            u in 0.1f64..4.0,
            x in 0.0f64..2.0,
        ) {
            let before = pollination_weights(&landscape(&b), u, x);
            let mut raised = b.clone();
            raised[0] += bump;
            let after = pollination_weights(&landscape(&raised), u, x);

            prop_assert!(after[0] < before[0]);
            for i in 1..b.len() {
                prop_assert!(after[i] > before[i]);
            }
        }
    }
}
