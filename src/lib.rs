//! HOTS Cells - event remapping and super-cell averaging
//!
//! One spark, many cells.
//!
//! # Core Types
//!
//! - **Event**: timestamp + position + channel, the unit flowing between layers
//! - **Remapper**: output encoding of `(event, cluster id)`
//! - **CellGrid**: overlapping super-cell geometry over the sensor plane
//! - **CellAverage**: running-average time surface per super-cell
//! - **CellLayer**: glues an upstream clustering stage to the above
//!
//! # Architecture: Source / Cells / Encoding
//!
//! 1. **Source** - upstream time surface + clustering, yields `(k, ts)` per event
//! 2. **Cells** - optional spatial subsampling; with overlap one event may
//!    land in several cells and fan out into several output events
//! 3. **Encoding** - the [`Remapper`] writes the cluster id into the output event
//!
//! # Core Concepts
//!
//! - **Stride**: distance between cell origins, `K - overlap`
//! - **Clipping**: edge cells are cut at the context border, so every point
//!   of the context belongs to at least one cell
//! - **Incremental mean**: `mean += (ts - mean) / (count + 1)`, no history kept
//! - **Contracts**: cell coordinates come from the grid itself; they are
//!   checked in debug builds and trusted in release builds
//!
//! # Example: Overlapping Cells
//!
//! ```rust
//! use hots_cells::{CellAverage, CellConfig, TimeSurface};
//!
//! // 10x10 context, 4x4 cells, overlap 2 -> stride 2, 4x4 cells
//! let config = CellConfig::new(10, 10, 4).with_overlap(2);
//! let mut cells = CellAverage::new(config).unwrap();
//! assert_eq!(cells.grid().cell_sizes(), (4, 4));
//!
//! // A point away from the border lies in four overlapping cells
//! let hits = cells.grid().find_cells(3, 3);
//! assert_eq!(hits, vec![(0, 0), (1, 0), (0, 1), (1, 1)]);
//!
//! // Average two time surfaces over one of them
//! cells.average(&TimeSurface::filled(3, 3, 1.0), 1, 1);
//! let mean = cells.average(&TimeSurface::filled(3, 3, 0.0), 1, 1);
//! assert!((mean.get(1, 1) - 0.5).abs() < 1e-12);
//! assert_eq!(cells.count(1, 1), 2);
//! ```
//!
//! # Example: Layer Output
//!
//! ```rust
//! use hots_cells::{
//!     process, CellGrid, CellConfig, CellLayer, CellMode, ClusterId, Event, Remapper,
//!     SurfaceSource, TimeSurface,
//! };
//!
//! // Stand-in for a clustering layer: cluster = polarity.
//! struct ByPolarity;
//!
//! impl SurfaceSource for ByPolarity {
//!     fn observe(&mut self, ev: &Event, _skip: bool) -> Option<(ClusterId, TimeSurface)> {
//!         Some((ev.p, TimeSurface::zeros(5, 5)))
//!     }
//!     fn reset(&mut self) {}
//! }
//!
//! let grid = CellGrid::new(CellConfig::new(8, 8, 4)).unwrap();
//! let mut layer = CellLayer::new(ByPolarity)
//!     .with_mode(CellMode::Cells(grid))
//!     .with_remapper(Remapper::serializing(2, 2).unwrap());
//!
//! let out = process(&mut layer, &[Event::new(1, 6, 1, 1)], false);
//! // Cell (1, 0), cluster 1 -> 2*2*1 + 2*0 + 1 = 5
//! assert_eq!(out[0].event, Event::new(1, 5, 0, 0));
//! ```

mod accumulator;
mod config;
mod error;
mod event;
mod grid;
mod layer;
mod remap;
mod surface;

pub use accumulator::CellAverage;
pub use config::CellConfig;
pub use error::{CellError, Result};
pub use event::{ClusterId, Event, Events};
pub use grid::CellGrid;
pub use layer::{
    process, process_batches, CellAnchor, CellLayer, CellMode, LayerOutput, Processor,
    SurfaceSource,
};
pub use remap::Remapper;
pub use surface::TimeSurface;
