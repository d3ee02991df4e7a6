//! Dense output tables.
//!
//! Diagnostics (pollination weights, visitation intensity) are not recorded
//! during integration; they are recomputed here from each stored snapshot.

use std::io::{self, Write};

use serde::{Deserialize, Serialize};

use super::{FLOWER_STATES, LANDSCAPE_STATES, LandscapeSystem, PollinatorResponse, Trajectory};

/// Column names of the landscape table.
pub const LANDSCAPE_COLUMNS: [&str; 5] = ["t", "p", "Y", "B", "P"];

/// Column names of the single-plant tables.
pub const FLOWER_COLUMNS: [&str; 5] = ["t", "Y", "B", "N", "P"];

/// Row-major numeric table with named columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: usize,
    data: Vec<f64>,
}

impl Table {
    /// Create a zero-filled table.
    pub fn zeros(columns: &[&str], rows: usize) -> Self {
        Self {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows,
            data: vec![0.0; rows * columns.len()],
        }
    }

    /// Table with no rows and no columns.
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: 0,
            data: Vec::new(),
        }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Index of the named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Row `i` as a slice.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let w = self.n_cols();
        &self.data[i * w..(i + 1) * w]
    }

    #[inline]
    fn row_mut(&mut self, i: usize) -> &mut [f64] {
        let w = self.n_cols();
        &mut self.data[i * w..(i + 1) * w]
    }

    /// Iterate over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_cols().max(1)).take(self.rows)
    }

    /// Value at row `i` of the named column.
    pub fn get(&self, i: usize, name: &str) -> Option<f64> {
        let j = self.column_index(name)?;
        (i < self.rows).then(|| self.data[i * self.n_cols() + j])
    }

    /// Copy of the named column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let j = self.column_index(name)?;
        Some(self.rows().map(|r| r[j]).collect())
    }

    /// Write the table as CSV with a header line.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", self.columns.join(","))?;
        for row in self.rows() {
            let mut first = true;
            for v in row {
                if !first {
                    write!(writer, ",")?;
                }
                write!(writer, "{}", v)?;
                first = false;
            }
            writeln!(writer)?;
        }
        writer.flush()
    }
}

/// Build the landscape table: one row per (time, plant).
///
/// Columns: `t, p, Y, B, P` where `p` is the zero-based plant index and `P`
/// the plant's pollination weight at that time.
pub fn landscape_table(trajectory: &Trajectory, system: &LandscapeSystem) -> Table {
    let np = system.n_plants();
    let mut table = Table::zeros(&LANDSCAPE_COLUMNS, trajectory.len() * np);
    let mut weights = vec![0.0; np];

    let mut i = 0;
    for (t, state) in trajectory.iter() {
        system.weights_for(state, &mut weights);
        for (k, plant) in state.chunks_exact(LANDSCAPE_STATES).enumerate() {
            let row = table.row_mut(i);
            row[0] = t;
            row[1] = k as f64;
            row[2..2 + LANDSCAPE_STATES].copy_from_slice(plant);
            row[2 + LANDSCAPE_STATES] = weights[k];
            i += 1;
        }
    }

    table
}

/// Build a single-plant table: one row per time.
///
/// Columns: `t, Y, B, N, P` where `P` is the visitation intensity.
pub fn flower_table(trajectory: &Trajectory, response: &PollinatorResponse) -> Table {
    let mut table = Table::zeros(&FLOWER_COLUMNS, trajectory.len());

    for (i, (t, state)) in trajectory.iter().enumerate() {
        let row = table.row_mut(i);
        row[0] = t;
        row[1..1 + FLOWER_STATES].copy_from_slice(state);
        row[1 + FLOWER_STATES] = response.intensity(state[0], state[1], state[2]);
    }

    table
}

/// Range and final value of one column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub last: f64,
}

/// Summary statistics of a table, for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSummary {
    pub rows: usize,
    pub non_finite: usize,
    pub columns: Vec<ColumnSummary>,
}

impl TableSummary {
    /// Compute statistics from a table. Non-finite values are counted and
    /// skipped in min/max.
    pub fn from_table(table: &Table) -> Self {
        let mut non_finite = 0usize;
        let mut columns: Vec<ColumnSummary> = table
            .columns()
            .iter()
            .map(|name| ColumnSummary {
                name: name.clone(),
                min: f64::INFINITY,
                max: f64::NEG_INFINITY,
                last: f64::NAN,
            })
            .collect();

        for row in table.rows() {
            for (summary, &v) in columns.iter_mut().zip(row) {
                summary.last = v;
                if v.is_finite() {
                    summary.min = summary.min.min(v);
                    summary.max = summary.max.max(v);
                } else {
                    non_finite += 1;
                }
            }
        }

        Self {
            rows: table.n_rows(),
            non_finite,
            columns,
        }
    }

    pub fn column(&self, name: &str) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LandscapeParams, PollinatorParams, TransitionRates};
    use std::fs;
    use tempfile::tempdir;

    fn landscape_trajectory() -> Trajectory {
        let mut traj = Trajectory::new(4);
        traj.push(&[0.5, 0.1, 0.4, 0.3], 0.0);
        traj.push(&[0.6, 0.1, 0.3, 0.4], 0.1);
        traj
    }

    #[test]
    fn test_landscape_layout() {
        let params = LandscapeParams::uniform(TransitionRates::default(), 2, 1.0, 0.5);
        let system = LandscapeSystem::new(params);
        let table = landscape_table(&landscape_trajectory(), &system);

        assert_eq!(table.n_rows(), 4);
        assert_eq!(table.columns(), &["t", "p", "Y", "B", "P"]);
        assert_eq!(table.column("t").unwrap(), vec![0.0, 0.0, 0.1, 0.1]);
        assert_eq!(table.column("p").unwrap(), vec![0.0, 1.0, 0.0, 1.0]);
        assert_eq!(table.row(3)[2..4], [0.3, 0.4]);

        // raw = [0.9, 0.7], norm = 2.1
        assert!((table.get(0, "P").unwrap() - 0.9 / 2.1).abs() < 1e-12);
        assert!((table.get(1, "P").unwrap() - 0.7 / 2.1).abs() < 1e-12);
    }

    #[test]
    fn test_flower_layout() {
        let params = PollinatorParams::default();
        let response = PollinatorResponse::new(&params);
        let mut traj = Trajectory::new(3);
        traj.push(&[1.0, 2.0, 3.0], 0.0);

        let table = flower_table(&traj, &response);
        assert_eq!(table.n_rows(), 1);
        assert_eq!(table.row(0)[..4], [0.0, 1.0, 2.0, 3.0]);
        assert_eq!(table.get(0, "P"), Some(response.intensity(1.0, 2.0, 3.0)));
        assert_eq!(table.get(1, "P"), None);
        assert_eq!(table.get(0, "missing"), None);
    }

    #[test]
    fn test_write_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.csv");

        let mut table = Table::zeros(&["t", "Y"], 2);
        table.row_mut(1).copy_from_slice(&[0.5, 1.25]);
        table.write_csv(fs::File::create(&path).unwrap()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "t,Y\n0,0\n0.5,1.25\n");
    }

    #[test]
    fn test_summary() {
        let mut table = Table::zeros(&["t", "Y"], 3);
        table.row_mut(0).copy_from_slice(&[0.0, 2.0]);
        table.row_mut(1).copy_from_slice(&[1.0, f64::NAN]);
        table.row_mut(2).copy_from_slice(&[2.0, -1.0]);

        let summary = TableSummary::from_table(&table);
        assert_eq!(summary.rows, 3);
        assert_eq!(summary.non_finite, 1);
        let y = summary.column("Y").unwrap();
        assert_eq!((y.min, y.max, y.last), (-1.0, 2.0, -1.0));
    }

    #[test]
    fn test_empty_table() {
        let table = Table::empty();
        assert!(table.is_empty());
        assert_eq!(table.rows().count(), 0);
        assert_eq!(table.column("t"), None);
    }
}
