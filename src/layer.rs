//! Layer plumbing - from upstream clustering to emitted events
//!
//! A [`CellLayer`] sits behind an upstream [`SurfaceSource`] (time surface +
//! clustering) and turns each `(event, cluster id)` pair into output events:
//!
//! ```text
//! event ─▶ SurfaceSource ─▶ (k, ts) ─▶ CellMode ─▶ Remapper ─▶ outputs
//!                                       │
//!                                       ├─ Direct:  one output
//!                                       ├─ Cells:   one output per cell
//!                                       └─ Average: one output per cell,
//!                                                   ts averaged over the cell
//! ```
//!
//! [`process`] and [`process_batches`] drive any [`Processor`] over whole
//! event sequences.

use crate::accumulator::CellAverage;
use crate::event::{ClusterId, Event, Events};
use crate::grid::CellGrid;
use crate::remap::Remapper;
use crate::surface::TimeSurface;

/// Upstream stage producing a cluster id and time surface per event.
pub trait SurfaceSource {
    /// Observe an event. `None` when the source does not emit for it
    /// (e.g. not enough temporal context yet, unless `skip_check`).
    fn observe(&mut self, ev: &Event, skip_check: bool) -> Option<(ClusterId, TimeSurface)>;

    /// Forget all temporal context.
    fn reset(&mut self);
}

/// Anything that consumes events one at a time.
pub trait Processor {
    type Output;

    fn reset(&mut self);

    fn process(&mut self, ev: &Event, skip_check: bool) -> Vec<Self::Output>;
}

/// Reset the processor, then feed it every event and collect all outputs.
pub fn process<P: Processor>(
    processor: &mut P,
    events: &[Event],
    skip_check: bool,
) -> Vec<P::Output> {
    processor.reset();

    let mut out = Vec::new();
    for ev in events {
        out.extend(processor.process(ev, skip_check));
    }
    out
}

/// [`process`] each sequence independently.
pub fn process_batches<P: Processor>(
    processor: &mut P,
    batches: &[Events],
    skip_check: bool,
) -> Vec<Vec<P::Output>> {
    batches
        .iter()
        .map(|events| process(processor, events, skip_check))
        .collect()
}

/// Spatial stage applied between clustering and remapping.
#[derive(Clone, Debug)]
pub enum CellMode {
    /// Keep the event position.
    Direct,
    /// Subsample into (possibly overlapping) super-cells.
    Cells(CellGrid),
    /// Subsample into super-cells and average time surfaces per cell.
    Average(CellAverage),
}

impl CellMode {
    pub fn grid(&self) -> Option<&CellGrid> {
        match self {
            CellMode::Direct => None,
            CellMode::Cells(grid) => Some(grid),
            CellMode::Average(acc) => Some(acc.grid()),
        }
    }
}

/// Where a cell output event is placed before remapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CellAnchor {
    /// Cell coordinates `(cx, cy)`.
    #[default]
    Index,
    /// Center of the cell window in input coordinates.
    Center,
}

/// One emitted event.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerOutput {
    pub event: Event,
    pub cluster: ClusterId,
    /// Cell-averaged time surface (`CellMode::Average` only).
    pub surface: Option<TimeSurface>,
}

/// Layer output stage: cell subsampling and output encoding.
#[derive(Clone, Debug)]
pub struct CellLayer<S> {
    source: S,
    mode: CellMode,
    remapper: Remapper,
    anchor: CellAnchor,
}

impl<S: SurfaceSource> CellLayer<S> {
    /// Direct mode, identity encoding.
    pub fn new(source: S) -> Self {
        Self {
            source,
            mode: CellMode::Direct,
            remapper: Remapper::Identity,
            anchor: CellAnchor::Index,
        }
    }

    pub fn with_remapper(mut self, remapper: Remapper) -> Self {
        self.remapper = remapper;
        self
    }

    pub fn with_mode(mut self, mode: CellMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_anchor(mut self, anchor: CellAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn mode(&self) -> &CellMode {
        &self.mode
    }

    pub fn remapper(&self) -> Remapper {
        self.remapper
    }
}

/// Position an event at a cell according to the anchor.
fn place(grid: &CellGrid, anchor: CellAnchor, ev: &Event, cx: u32, cy: u32) -> Event {
    let (x, y) = match anchor {
        CellAnchor::Index => (cx, cy),
        CellAnchor::Center => grid.cell_center(cx, cy),
    };
    Event::new(ev.t, x, y, ev.p)
}

impl<S: SurfaceSource> Processor for CellLayer<S> {
    type Output = LayerOutput;

    fn reset(&mut self) {
        self.source.reset();
        if let CellMode::Average(acc) = &mut self.mode {
            acc.reset();
        }
        log::debug!("[LAYER] reset");
    }

    fn process(&mut self, ev: &Event, skip_check: bool) -> Vec<LayerOutput> {
        let Some((k, ts)) = self.source.observe(ev, skip_check) else {
            return Vec::new();
        };

        // `skip_check` only concerns the source; cells never see points
        // outside the context.
        if let Some(grid) = self.mode.grid() {
            if !grid.contains(ev.x, ev.y) {
                log::trace!("[LAYER] dropping ({}, {}) outside context", ev.x, ev.y);
                return Vec::new();
            }
        }

        let remapper = self.remapper;
        let anchor = self.anchor;
        match &mut self.mode {
            CellMode::Direct => vec![LayerOutput {
                event: remapper.remap(*ev, k),
                cluster: k,
                surface: None,
            }],
            CellMode::Cells(grid) => grid
                .find_cells(ev.x, ev.y)
                .into_iter()
                .map(|(cx, cy)| LayerOutput {
                    event: remapper.remap(place(grid, anchor, ev, cx, cy), k),
                    cluster: k,
                    surface: None,
                })
                .collect(),
            CellMode::Average(acc) => {
                let cells = acc.grid().find_cells(ev.x, ev.y);
                cells
                    .into_iter()
                    .map(|(cx, cy)| {
                        let at = place(acc.grid(), anchor, ev, cx, cy);
                        let mean = acc.average(&ts, cx, cy).clone();
                        LayerOutput {
                            event: remapper.remap(at, k),
                            cluster: k,
                            surface: Some(mean),
                        }
                    })
                    .collect()
            }
        }
    }
}
