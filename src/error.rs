//! Construction errors

use thiserror::Error;

/// Reasons a grid, remapper or surface refuses to be built.
///
/// Per-event operations never fail; they assume inputs produced by the
/// structures themselves and only check contracts in debug builds.
#[derive(Debug, Error)]
pub enum CellError {
    #[error("context must be non-empty (got {width}x{height})")]
    ZeroContext { width: u32, height: u32 },
    #[error("cell size must be > 0")]
    ZeroCellSize,
    #[error("cell size {size} exceeds context {width}x{height}")]
    CellTooLarge { size: u32, width: u32, height: u32 },
    #[error("overlap {overlap} must be smaller than cell size {size}")]
    OverlapTooLarge { overlap: u32, size: u32 },
    #[error("output size must be non-empty (got {width}x{height})")]
    ZeroOutputSize { width: u32, height: u32 },
    #[error("surface shape: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

pub type Result<T> = std::result::Result<T, CellError>;
