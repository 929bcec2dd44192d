//! Cell Grid - overlapping super-cell partition of the context
//!
//! Cells are square windows of side K whose origins sit on multiples of the
//! stride `K - overlap`. Windows along the right and bottom edges are clipped
//! to the context, so every point of the context lies in at least one cell.
//!
//! ## Layout
//!
//! ```text
//! x:   0   s   2s  ...
//!      [---K---)
//!          [---K---)
//!              [---K---)      <- last window, clipped at width
//! ```
//!
//! Cell coordinates passed back in (`is_in_cell`, `cell_center`, ...) must
//! come from [`CellGrid::find_cells`] or [`CellGrid::cells`]. They are
//! checked with `debug_assert!` only.

use crate::config::CellConfig;
use crate::error::Result;
use std::ops::{Range, RangeInclusive};

/// Stateless geometry of a super-cell grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CellGrid {
    config: CellConfig,

    /// Number of cells (horizontal).
    wcell: u32,

    /// Number of cells (vertical).
    hcell: u32,
}

/// Number of windows of size `k`, stepping by `stride`, needed to cover `extent`.
#[inline]
fn cells_along(extent: u32, k: u32, stride: u32) -> u32 {
    1 + (extent - k).div_ceil(stride)
}

/// Indices of the windows along one axis that contain `e`.
#[inline]
fn windows_containing(e: u32, k: u32, stride: u32, count: u32) -> RangeInclusive<u32> {
    // Window c contains e iff c*stride <= e < c*stride + k.
    let first = if e >= k { (e - k) / stride + 1 } else { 0 };
    let last = (e / stride).min(count - 1);
    first..=last
}

impl CellGrid {
    /// Build the grid. Fails if the geometry is inconsistent.
    pub fn new(config: CellConfig) -> Result<Self> {
        config.validate()?;

        let stride = config.stride();
        let wcell = cells_along(config.width, config.cell_size, stride);
        let hcell = cells_along(config.height, config.cell_size, stride);

        log::debug!(
            "[CELLS] {}x{} context, K={} overlap={}: {}x{} cells",
            config.width,
            config.height,
            config.cell_size,
            config.overlap,
            wcell,
            hcell
        );

        Ok(Self {
            config,
            wcell,
            hcell,
        })
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Every cell whose window contains `(ex, ey)`, ascending `cy` then `cx`.
    ///
    /// Exactly one cell without overlap, up to `ceil(K / stride)` per axis
    /// with overlap.
    pub fn find_cells(&self, ex: u32, ey: u32) -> Vec<(u32, u32)> {
        debug_assert!(
            self.contains(ex, ey),
            "point ({}, {}) outside {}x{} context",
            ex,
            ey,
            self.config.width,
            self.config.height
        );

        let k = self.config.cell_size;
        let stride = self.config.stride();
        let xs = windows_containing(ex, k, stride, self.wcell);
        let ys = windows_containing(ey, k, stride, self.hcell);

        let mut cells = Vec::with_capacity(xs.clone().count() * ys.clone().count());
        for cy in ys {
            for cx in xs.clone() {
                cells.push((cx, cy));
            }
        }
        cells
    }

    /// Whether `(ex, ey)` falls inside the clipped window of cell `(cx, cy)`.
    pub fn is_in_cell(&self, cx: u32, cy: u32, ex: u32, ey: u32) -> bool {
        let (xs, ys) = self.cell_window(cx, cy);
        xs.contains(&ex) && ys.contains(&ey)
    }

    /// Half-open window of a cell, clipped to the context.
    pub fn cell_window(&self, cx: u32, cy: u32) -> (Range<u32>, Range<u32>) {
        self.debug_check_cell(cx, cy);
        let k = self.config.cell_size;
        let stride = self.config.stride();

        let x0 = cx * stride;
        let y0 = cy * stride;
        (
            x0..(x0 + k).min(self.config.width),
            y0..(y0 + k).min(self.config.height),
        )
    }

    /// Center of the (clipped) cell window in event space.
    pub fn cell_center(&self, cx: u32, cy: u32) -> (u32, u32) {
        let (xs, ys) = self.cell_window(cx, cy);
        (
            xs.start + (xs.end - xs.start) / 2,
            ys.start + (ys.end - ys.start) / 2,
        )
    }

    /// All cell coordinates, ascending `cy` then `cx`.
    pub fn cells(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (0..self.hcell).flat_map(move |cy| (0..self.wcell).map(move |cx| (cx, cy)))
    }

    /// Whether a point lies in the context.
    #[inline]
    pub fn contains(&self, ex: u32, ey: u32) -> bool {
        ex < self.config.width && ey < self.config.height
    }

    /// Row-major index of a cell, for flat per-cell storage.
    #[inline]
    pub(crate) fn cell_index(&self, cx: u32, cy: u32) -> usize {
        self.debug_check_cell(cx, cy);
        cy as usize * self.wcell as usize + cx as usize
    }

    #[inline]
    fn debug_check_cell(&self, cx: u32, cy: u32) {
        debug_assert!(
            cx < self.wcell && cy < self.hcell,
            "cell ({}, {}) outside {}x{} grid",
            cx,
            cy,
            self.wcell,
            self.hcell
        );
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn config(&self) -> &CellConfig {
        &self.config
    }

    /// Size of the context as `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Number of cells as `(horizontal, vertical)`.
    pub fn cell_sizes(&self) -> (u32, u32) {
        (self.wcell, self.hcell)
    }

    /// Total number of cells.
    pub fn cell_count(&self) -> usize {
        self.wcell as usize * self.hcell as usize
    }

    pub fn cell_size(&self) -> u32 {
        self.config.cell_size
    }

    pub fn overlap(&self) -> u32 {
        self.config.overlap
    }

    pub fn stride(&self) -> u32 {
        self.config.stride()
    }
}
