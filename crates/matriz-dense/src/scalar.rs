//! Element Types
//!
//! The closed set of numeric element kinds the bridge understands, and the
//! trait that ties each Rust scalar to its kind, its byte encoding, and its
//! place in [`DenseValue`].
//!
//! ## Design Notes
//!
//! Every element kind maps to exactly one host-runtime type code (the
//! mapping itself lives on the bridge side). No implicit widening or
//! narrowing is ever performed: an `f32` buffer is never an `f64` value.

use std::fmt;

use crate::matrix::DenseMatrix;
use crate::value::DenseValue;

/// Numeric element kind of a native dense type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    /// 64-bit IEEE 754 floating point
    F64,
    /// 32-bit IEEE 754 floating point
    F32,
    /// Signed 32-bit integer
    I32,
}

impl ElementType {
    /// Size of one element in bytes.
    pub fn size_of(&self) -> usize {
        match self {
            ElementType::F64 => 8,
            ElementType::F32 => 4,
            ElementType::I32 => 4,
        }
    }

    /// Human-readable name of the element kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementType::F64 => "f64",
            ElementType::F32 => "f32",
            ElementType::I32 => "i32",
        }
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Trait for scalars that can be matrix elements.
///
/// Implemented for exactly the types enumerated by [`ElementType`]; the
/// [`DenseValue`] enum closes the set.
pub trait Scalar: Copy + fmt::Debug + Default + PartialEq + Send + Sync + 'static {
    /// The element kind of this scalar.
    const ELEMENT: ElementType;

    /// Decode one element from native-endian bytes.
    fn from_bytes(bytes: &[u8]) -> Self;

    /// Encode one element into native-endian bytes.
    fn write_bytes(self, out: &mut [u8]);

    /// Wrap a matrix of this scalar into a [`DenseValue`].
    fn into_value(matrix: DenseMatrix<Self>) -> DenseValue;

    /// Borrow a matrix of this scalar out of a [`DenseValue`], if the
    /// element kinds agree.
    fn from_value(value: &DenseValue) -> Option<&DenseMatrix<Self>>;
}

impl Scalar for f64 {
    const ELEMENT: ElementType = ElementType::F64;

    fn from_bytes(bytes: &[u8]) -> Self {
        let arr: [u8; 8] = bytes[..8].try_into().unwrap();
        f64::from_ne_bytes(arr)
    }

    fn write_bytes(self, out: &mut [u8]) {
        out[..8].copy_from_slice(&self.to_ne_bytes());
    }

    fn into_value(matrix: DenseMatrix<Self>) -> DenseValue {
        DenseValue::F64(matrix)
    }

    fn from_value(value: &DenseValue) -> Option<&DenseMatrix<Self>> {
        match value {
            DenseValue::F64(m) => Some(m),
            _ => None,
        }
    }
}

impl Scalar for f32 {
    const ELEMENT: ElementType = ElementType::F32;

    fn from_bytes(bytes: &[u8]) -> Self {
        let arr: [u8; 4] = bytes[..4].try_into().unwrap();
        f32::from_ne_bytes(arr)
    }

    fn write_bytes(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_ne_bytes());
    }

    fn into_value(matrix: DenseMatrix<Self>) -> DenseValue {
        DenseValue::F32(matrix)
    }

    fn from_value(value: &DenseValue) -> Option<&DenseMatrix<Self>> {
        match value {
            DenseValue::F32(m) => Some(m),
            _ => None,
        }
    }
}

impl Scalar for i32 {
    const ELEMENT: ElementType = ElementType::I32;

    fn from_bytes(bytes: &[u8]) -> Self {
        let arr: [u8; 4] = bytes[..4].try_into().unwrap();
        i32::from_ne_bytes(arr)
    }

    fn write_bytes(self, out: &mut [u8]) {
        out[..4].copy_from_slice(&self.to_ne_bytes());
    }

    fn into_value(matrix: DenseMatrix<Self>) -> DenseValue {
        DenseValue::I32(matrix)
    }

    fn from_value(value: &DenseValue) -> Option<&DenseMatrix<Self>> {
        match value {
            DenseValue::I32(m) => Some(m),
            _ => None,
        }
    }
}
