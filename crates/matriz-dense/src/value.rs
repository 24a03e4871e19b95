//! Boundary Values
//!
//! [`DenseValue`] is the closed union of every dense instantiation that can
//! cross the runtime boundary. Converters stored in the registry are
//! type-erased over this enum; the per-element accessors recover the typed
//! matrix on the other side.

use std::fmt;

use crate::matrix::DenseMatrix;
use crate::scalar::ElementType;

/// A native dense value of any supported element kind.
#[derive(Debug, Clone, PartialEq)]
pub enum DenseValue {
    /// 64-bit float matrix or vector
    F64(DenseMatrix<f64>),
    /// 32-bit float matrix or vector
    F32(DenseMatrix<f32>),
    /// 32-bit integer matrix or vector
    I32(DenseMatrix<i32>),
}

impl DenseValue {
    /// Element kind of the wrapped matrix.
    pub fn element(&self) -> ElementType {
        match self {
            DenseValue::F64(_) => ElementType::F64,
            DenseValue::F32(_) => ElementType::F32,
            DenseValue::I32(_) => ElementType::I32,
        }
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        match self {
            DenseValue::F64(m) => m.rows(),
            DenseValue::F32(m) => m.rows(),
            DenseValue::I32(m) => m.rows(),
        }
    }

    /// Number of columns.
    pub fn cols(&self) -> usize {
        match self {
            DenseValue::F64(m) => m.cols(),
            DenseValue::F32(m) => m.cols(),
            DenseValue::I32(m) => m.cols(),
        }
    }

    /// Runtime shape as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    /// Try to borrow as an `f64` matrix.
    pub fn as_f64(&self) -> Option<&DenseMatrix<f64>> {
        match self {
            DenseValue::F64(m) => Some(m),
            _ => None,
        }
    }

    /// Try to borrow as an `f32` matrix.
    pub fn as_f32(&self) -> Option<&DenseMatrix<f32>> {
        match self {
            DenseValue::F32(m) => Some(m),
            _ => None,
        }
    }

    /// Try to borrow as an `i32` matrix.
    pub fn as_i32(&self) -> Option<&DenseMatrix<i32>> {
        match self {
            DenseValue::I32(m) => Some(m),
            _ => None,
        }
    }
}

impl fmt::Display for DenseValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (rows, cols) = self.shape();
        write!(f, "<{} dense {}x{}>", self.element(), rows, cols)
    }
}

impl From<DenseMatrix<f64>> for DenseValue {
    fn from(m: DenseMatrix<f64>) -> Self {
        DenseValue::F64(m)
    }
}

impl From<DenseMatrix<f32>> for DenseValue {
    fn from(m: DenseMatrix<f32>) -> Self {
        DenseValue::F32(m)
    }
}

impl From<DenseMatrix<i32>> for DenseValue {
    fn from(m: DenseMatrix<i32>) -> Self {
        DenseValue::I32(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_and_shape() {
        let value = DenseValue::from(DenseMatrix::<f64>::zeros(3, 5));
        assert_eq!(value.element(), ElementType::F64);
        assert_eq!(value.shape(), (3, 5));
    }

    #[test]
    fn test_typed_accessors() {
        let value = DenseValue::from(DenseMatrix::<i32>::zeros(2, 2));
        assert!(value.as_i32().is_some());
        assert!(value.as_f64().is_none());
        assert!(value.as_f32().is_none());
    }

    #[test]
    fn test_display() {
        let value = DenseValue::from(DenseMatrix::<f32>::zeros(4, 1));
        assert_eq!(value.to_string(), "<f32 dense 4x1>");
    }
}
