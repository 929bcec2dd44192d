//! Cell geometry configuration

use crate::error::{CellError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geometry of a super-cell grid over a `width x height` context.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellConfig {
    /// Width of the context.
    pub width: u32,

    /// Height of the context.
    pub height: u32,

    /// Side of the square cells (K).
    pub cell_size: u32,

    /// Overlap between neighbouring cells (0 = plain tiling).
    pub overlap: u32,
}

impl CellConfig {
    /// Create a non-overlapping configuration.
    pub fn new(width: u32, height: u32, cell_size: u32) -> Self {
        Self {
            width,
            height,
            cell_size,
            overlap: 0,
        }
    }

    pub fn with_overlap(mut self, overlap: u32) -> Self {
        self.overlap = overlap;
        self
    }

    /// Distance between consecutive cell origins.
    ///
    /// Only meaningful on a validated configuration.
    #[inline]
    pub fn stride(&self) -> u32 {
        self.cell_size - self.overlap
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(CellError::ZeroContext {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_size == 0 {
            return Err(CellError::ZeroCellSize);
        }
        if self.cell_size > self.width.min(self.height) {
            return Err(CellError::CellTooLarge {
                size: self.cell_size,
                width: self.width,
                height: self.height,
            });
        }
        if self.overlap >= self.cell_size {
            return Err(CellError::OverlapTooLarge {
                overlap: self.overlap,
                size: self.cell_size,
            });
        }
        Ok(())
    }
}
