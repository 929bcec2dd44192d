//! Cell Accumulator Grid - running-average time surface per super-cell
//!
//! Owns a [`CellGrid`] for geometry and one accumulator per cell. Each
//! contribution is folded into the cell mean incrementally:
//!
//! ```text
//! count == 0:  mean = ts
//! otherwise:   mean = mean + (ts - mean) / (count + 1)
//! ```
//!
//! No history is kept and no growing sum can overflow. Results match
//! `sum / count` up to floating-point rounding of the incremental form.

use crate::config::CellConfig;
use crate::error::Result;
use crate::grid::CellGrid;
use crate::surface::TimeSurface;

/// Accumulator state of a single cell.
#[derive(Clone, Debug)]
struct CellMemory {
    /// Running mean; meaningless while `count == 0`.
    mean: TimeSurface,

    /// Number of contributions folded into `mean`.
    count: u32,
}

impl CellMemory {
    fn empty() -> Self {
        Self {
            mean: TimeSurface::zeros(0, 0),
            count: 0,
        }
    }
}

/// Super-cell grid that averages time surfaces over each cell.
///
/// Not internally synchronized: one instance per event stream.
#[derive(Clone, Debug)]
pub struct CellAverage {
    grid: CellGrid,

    /// Row-major, `wcell * hcell` entries.
    cells: Vec<CellMemory>,
}

impl CellAverage {
    /// Create a grid of empty accumulators.
    pub fn new(config: CellConfig) -> Result<Self> {
        Ok(Self::from_grid(CellGrid::new(config)?))
    }

    pub fn from_grid(grid: CellGrid) -> Self {
        let cells = vec![CellMemory::empty(); grid.cell_count()];
        Self { grid, cells }
    }

    // =========================================================================
    // ACCUMULATION
    // =========================================================================

    /// Fold `ts` into the mean of cell `(cx, cy)` and return the updated mean.
    ///
    /// `(cx, cy)` must come from [`CellGrid::find_cells`]; every contribution
    /// to a cell must have the same shape. Both are checked in debug builds
    /// only.
    pub fn average(&mut self, ts: &TimeSurface, cx: u32, cy: u32) -> &TimeSurface {
        let idx = self.grid.cell_index(cx, cy);
        let cell = &mut self.cells[idx];

        if cell.count == 0 {
            cell.mean = ts.clone();
        } else {
            debug_assert_eq!(
                cell.mean.shape(),
                ts.shape(),
                "time surface shape changed for cell ({}, {})",
                cx,
                cy
            );
            cell.mean.merge_mean(ts, cell.count);
        }
        cell.count += 1;

        log::trace!("[AVG] cell ({}, {}) count={}", cx, cy, cell.count);
        &cell.mean
    }

    /// Clear every accumulator.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            *cell = CellMemory::empty();
        }
        log::debug!("[AVG] reset {} cells", self.cells.len());
    }

    /// Clear a single accumulator.
    pub fn reset_cell(&mut self, cx: u32, cy: u32) {
        let idx = self.grid.cell_index(cx, cy);
        self.cells[idx] = CellMemory::empty();
    }

    // =========================================================================
    // READING
    // =========================================================================

    /// Current mean of a cell, or `None` if it has no contributions.
    pub fn mean(&self, cx: u32, cy: u32) -> Option<&TimeSurface> {
        let cell = &self.cells[self.grid.cell_index(cx, cy)];
        (cell.count > 0).then_some(&cell.mean)
    }

    /// Number of contributions a cell has received.
    pub fn count(&self, cx: u32, cy: u32) -> u32 {
        self.cells[self.grid.cell_index(cx, cy)].count
    }

    /// Total contributions across all cells.
    pub fn total_count(&self) -> u64 {
        self.cells.iter().map(|c| u64::from(c.count)).sum()
    }

    /// Underlying geometry.
    pub fn grid(&self) -> &CellGrid {
        &self.grid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn average(w: u32, h: u32, k: u32, o: u32) -> CellAverage {
        CellAverage::new(CellConfig::new(w, h, k).with_overlap(o)).unwrap()
    }

    #[test]
    fn test_new_is_empty() {
        let acc = average(10, 10, 4, 2);
        assert_eq!(acc.grid().cell_sizes(), (4, 4));
        for (cx, cy) in acc.grid().cells() {
            assert_eq!(acc.count(cx, cy), 0);
            assert!(acc.mean(cx, cy).is_none());
        }
        assert_eq!(acc.total_count(), 0);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(CellAverage::new(CellConfig::new(10, 10, 4).with_overlap(4)).is_err());
    }

    #[test]
    fn test_first_contribution_unchanged() {
        let mut acc = average(8, 8, 4, 0);
        let ts = TimeSurface::from_shape_vec(2, 3, vec![0.1, 0.2, 0.3, 0.4, 0.5, 0.6]).unwrap();

        let mean = acc.average(&ts, 1, 0).clone();
        assert_eq!(mean, ts);
        assert_eq!(acc.count(1, 0), 1);
    }

    #[test]
    fn test_incremental_mean_matches_batch() {
        let mut acc = average(8, 8, 4, 0);
        let samples: Vec<TimeSurface> = (0..50)
            .map(|i| {
                let v: Vec<f64> = (0..9).map(|j| ((i * 7 + j * 3) % 11) as f64 * 0.37).collect();
                TimeSurface::from_shape_vec(3, 3, v).unwrap()
            })
            .collect();

        let mut last = TimeSurface::zeros(3, 3);
        for ts in &samples {
            last = acc.average(ts, 1, 1).clone();
        }

        let mut sum = TimeSurface::zeros(3, 3).into_array();
        for ts in &samples {
            sum += ts.as_array();
        }
        let batch = TimeSurface::from(sum / samples.len() as f64);

        for r in 0..3 {
            for c in 0..3 {
                let expected = batch.get(r, c);
                let rel = (last.get(r, c) - expected).abs() / expected.abs().max(1.0);
                assert!(rel <= 1e-9, "({}, {}): {} vs {}", r, c, last.get(r, c), expected);
            }
        }
        assert_eq!(acc.count(1, 1), 50);
    }

    #[test]
    fn test_cells_are_independent() {
        let mut acc = average(8, 8, 4, 0);
        acc.average(&TimeSurface::filled(2, 2, 1.0), 0, 0);
        acc.average(&TimeSurface::filled(2, 2, 3.0), 0, 0);
        acc.average(&TimeSurface::filled(2, 2, 10.0), 1, 1);

        assert!((acc.mean(0, 0).unwrap().get(0, 0) - 2.0).abs() < 1e-12);
        assert!((acc.mean(1, 1).unwrap().get(1, 1) - 10.0).abs() < 1e-12);
        assert_eq!(acc.count(1, 0), 0);
        assert_eq!(acc.count(0, 1), 0);
        assert_eq!(acc.total_count(), 3);
    }

    #[test]
    fn test_zero_contribution_lowers_mean() {
        let mut acc = average(4, 4, 2, 0);
        acc.average(&TimeSurface::filled(1, 1, 4.0), 0, 0);
        let mean = acc.average(&TimeSurface::zeros(1, 1), 0, 0);
        assert!((mean.get(0, 0) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_reset() {
        let mut acc = average(8, 8, 4, 2);
        acc.average(&TimeSurface::filled(2, 2, 5.0), 0, 0);
        acc.average(&TimeSurface::filled(2, 2, 5.0), 2, 1);

        acc.reset_cell(2, 1);
        assert_eq!(acc.count(2, 1), 0);
        assert_eq!(acc.count(0, 0), 1);

        acc.reset();
        assert_eq!(acc.total_count(), 0);

        // Restart: first contribution is taken as-is again.
        let ts = TimeSurface::filled(3, 1, 0.25);
        assert_eq!(acc.average(&ts, 0, 0), &ts);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "outside 4x4 grid")]
    fn test_average_out_of_range_cell_panics() {
        let mut acc = average(10, 10, 4, 2);
        let (wcell, _) = acc.grid().cell_sizes();
        acc.average(&TimeSurface::zeros(2, 2), wcell, 0);
    }

    #[cfg(debug_assertions)]
    #[test]
    #[should_panic(expected = "time surface shape changed")]
    fn test_average_shape_mismatch_panics() {
        let mut acc = average(8, 8, 4, 0);
        acc.average(&TimeSurface::zeros(2, 2), 0, 0);
        acc.average(&TimeSurface::zeros(3, 2), 0, 0);
    }
}
