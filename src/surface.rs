//! Time Surface - local temporal context around an event
//!
//! Computed upstream and treated here as an opaque 2-D array that only needs
//! element-wise arithmetic for averaging.

use crate::error::Result;
use ndarray::Array2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Fixed-shape feature surface, indexed `(row, col)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TimeSurface {
    values: Array2<f64>,
}

impl TimeSurface {
    /// Create a new zero-initialized surface.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            values: Array2::zeros((rows, cols)),
        }
    }

    /// Create a surface filled with one value.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            values: Array2::from_elem((rows, cols), value),
        }
    }

    /// Create from row-major values.
    pub fn from_shape_vec(rows: usize, cols: usize, values: Vec<f64>) -> Result<Self> {
        Ok(Self {
            values: Array2::from_shape_vec((rows, cols), values)?,
        })
    }

    /// Shape as `(rows, cols)`.
    #[inline]
    pub fn shape(&self) -> (usize, usize) {
        self.values.dim()
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.values[[row, col]]
    }

    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.values[[row, col]] = value;
    }

    pub fn as_array(&self) -> &Array2<f64> {
        &self.values
    }

    pub fn into_array(self) -> Array2<f64> {
        self.values
    }

    /// Fold one more sample into a running mean of `count` samples.
    ///
    /// `mean += (sample - mean) / (count + 1)`, element-wise and in place.
    pub fn merge_mean(&mut self, sample: &TimeSurface, count: u32) {
        debug_assert_eq!(self.shape(), sample.shape());
        let n = f64::from(count) + 1.0;
        self.values
            .zip_mut_with(&sample.values, |m, &v| *m += (v - *m) / n);
    }

    /// Check if all values are zero.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|&v| v == 0.0)
    }

    /// Largest element-wise absolute difference to another surface.
    pub fn max_abs_diff(&self, other: &TimeSurface) -> f64 {
        debug_assert_eq!(self.shape(), other.shape());
        self.values
            .iter()
            .zip(other.values.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl From<Array2<f64>> for TimeSurface {
    fn from(values: Array2<f64>) -> Self {
        Self { values }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_is_zero() {
        let s = TimeSurface::zeros(3, 5);
        assert!(s.is_zero());
        assert_eq!(s.shape(), (3, 5));
    }

    #[test]
    fn test_from_shape_vec() {
        let s = TimeSurface::from_shape_vec(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(s.get(1, 0), 3.0);
        assert!(TimeSurface::from_shape_vec(2, 2, vec![1.0]).is_err());
    }

    #[test]
    fn test_merge_mean() {
        let mut mean = TimeSurface::filled(2, 2, 1.0);
        mean.merge_mean(&TimeSurface::filled(2, 2, 3.0), 1);
        assert!((mean.get(0, 0) - 2.0).abs() < 1e-12);

        // Third sample weighs a third.
        mean.merge_mean(&TimeSurface::filled(2, 2, 5.0), 2);
        assert!((mean.get(1, 1) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_max_abs_diff() {
        let a = TimeSurface::from_shape_vec(1, 3, vec![0.0, 1.0, 2.0]).unwrap();
        let b = TimeSurface::from_shape_vec(1, 3, vec![0.5, 1.0, -1.0]).unwrap();
        assert!((a.max_abs_diff(&b) - 3.0).abs() < 1e-12);
    }
}
