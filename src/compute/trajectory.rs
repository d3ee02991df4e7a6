//! Trajectory recorder.

use super::Observer;

/// Append-only record of `(time, state)` pairs.
///
/// States are stored row-major in a single buffer, one row of `dimension`
/// values per recorded time.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    dimension: usize,
    times: Vec<f64>,
    data: Vec<f64>,
}

impl Trajectory {
    /// Create an empty trajectory for states of length `dimension`.
    pub fn new(dimension: usize) -> Self {
        Self {
            dimension,
            times: Vec::new(),
            data: Vec::new(),
        }
    }

    /// Create an empty trajectory with room for `capacity` snapshots.
    pub fn with_capacity(dimension: usize, capacity: usize) -> Self {
        Self {
            dimension,
            times: Vec::with_capacity(capacity),
            data: Vec::with_capacity(capacity * dimension),
        }
    }

    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of recorded snapshots.
    #[inline]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    #[inline]
    pub fn time(&self, i: usize) -> f64 {
        self.times[i]
    }

    /// State recorded at snapshot `i`.
    #[inline]
    pub fn state(&self, i: usize) -> &[f64] {
        &self.data[i * self.dimension..(i + 1) * self.dimension]
    }

    /// Iterate over `(time, state)` pairs in recording order.
    pub fn iter(&self) -> impl Iterator<Item = (f64, &[f64])> + '_ {
        self.times
            .iter()
            .copied()
            .zip(self.data.chunks_exact(self.dimension.max(1)))
    }

    /// Final snapshot, if any.
    pub fn last(&self) -> Option<(f64, &[f64])> {
        let n = self.len();
        (n > 0).then(|| (self.times[n - 1], self.state(n - 1)))
    }

    /// Count of NaN or infinite state values.
    pub fn non_finite_count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_finite()).count()
    }

    /// Append a snapshot.
    pub fn push(&mut self, x: &[f64], t: f64) {
        assert_eq!(x.len(), self.dimension, "snapshot dimension mismatch");
        self.times.push(t);
        self.data.extend_from_slice(x);
    }
}

impl Observer for Trajectory {
    #[inline]
    fn observe(&mut self, x: &[f64], t: f64) {
        self.push(x, t);
    }
}
