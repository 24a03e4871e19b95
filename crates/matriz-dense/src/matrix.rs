//! Dense Matrix Storage
//!
//! Owned, row-major dense storage with runtime extents. Vectors are column
//! matrices (`len` x 1); the bridge materializes every vector-shaped value
//! this way regardless of the host buffer's orientation.

use std::ops::{Index, IndexMut};

use thiserror::Error;

use crate::scalar::Scalar;

/// Errors raised while constructing a matrix from existing data.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    /// Element count does not match the requested extents
    #[error("data length {len} does not fill a {rows}x{cols} matrix")]
    LengthMismatch {
        /// Requested row count
        rows: usize,
        /// Requested column count
        cols: usize,
        /// Provided element count
        len: usize,
    },
}

/// Owned dense matrix with row-major storage.
#[derive(Debug, Clone, PartialEq)]
pub struct DenseMatrix<T: Scalar> {
    rows: usize,
    cols: usize,
    data: Vec<T>,
}

impl<T: Scalar> DenseMatrix<T> {
    /// Create a zero-initialized matrix.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![T::default(); rows * cols],
        }
    }

    /// Create a matrix from row-major data.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<T>) -> Result<Self, ShapeError> {
        if data.len() != rows * cols {
            return Err(ShapeError::LengthMismatch {
                rows,
                cols,
                len: data.len(),
            });
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a column vector (`len` x 1).
    pub fn column(data: Vec<T>) -> Self {
        Self {
            rows: data.len(),
            cols: 1,
            data,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Runtime shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the matrix has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element at (row, col), if in bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<T> {
        if row < self.rows && col < self.cols {
            Some(self.data[row * self.cols + col])
        } else {
            None
        }
    }

    /// Row-major view of the underlying storage.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Mutable row-major view of the underlying storage.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }
}

impl<T: Scalar> Index<(usize, usize)> for DenseMatrix<T> {
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        debug_assert!(row < self.rows && col < self.cols);
        &self.data[row * self.cols + col]
    }
}

impl<T: Scalar> IndexMut<(usize, usize)> for DenseMatrix<T> {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        debug_assert!(row < self.rows && col < self.cols);
        &mut self.data[row * self.cols + col]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_zeros() {
        let m = DenseMatrix::<f64>::zeros(3, 5);
        assert_eq!(m.shape(), (3, 5));
        assert_eq!(m.len(), 15);
        assert!(m.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_from_vec_row_major() {
        let m = DenseMatrix::from_vec(2, 3, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]).unwrap();
        assert_eq!(m[(0, 0)], 1.0);
        assert_eq!(m[(0, 2)], 3.0);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(m[(1, 2)], 6.0);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let err = DenseMatrix::from_vec(2, 3, vec![1.0f64; 5]).unwrap_err();
        assert_eq!(
            err,
            ShapeError::LengthMismatch {
                rows: 2,
                cols: 3,
                len: 5
            }
        );
    }

    #[test]
    fn test_column_vector() {
        let v = DenseMatrix::column(vec![1i32, 2, 3]);
        assert_eq!(v.shape(), (3, 1));
        assert_eq!(v[(2, 0)], 3);
    }

    #[test]
    fn test_get_out_of_bounds() {
        let m = DenseMatrix::<f32>::zeros(2, 2);
        assert_eq!(m.get(1, 1), Some(0.0));
        assert_eq!(m.get(2, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn test_index_mut() {
        let mut m = DenseMatrix::<i32>::zeros(2, 2);
        m[(0, 1)] = 42;
        assert_eq!(m.get(0, 1), Some(42));
    }
}
