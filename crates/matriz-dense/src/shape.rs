//! Shape Contracts
//!
//! A native dense type declares, at registration time, which of its
//! dimensions are fixed and which are decided at runtime. The contract is a
//! closed set: exactly one [`ShapeClass`] variant applies to any registered
//! type, and the bridge dispatches on it exhaustively.

use std::fmt;

use crate::scalar::ElementType;

/// Compile-time dimensionality contract of a native dense type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShapeClass {
    /// Both extents fixed
    Fixed { rows: usize, cols: usize },
    /// Fixed row count, dynamic column count
    FixedRows { rows: usize },
    /// Dynamic row count, fixed column count
    FixedCols { cols: usize },
    /// Both extents dynamic
    Dynamic,
    /// Vector with a fixed or dynamic extent; row/column orientation is
    /// resolved at bind time from the host buffer's layout
    Vector { len: Option<usize> },
}

impl ShapeClass {
    /// Whether this is a vector shape.
    pub fn is_vector(&self) -> bool {
        matches!(self, ShapeClass::Vector { .. })
    }

    /// The fixed row count, if the contract has one.
    pub fn fixed_rows(&self) -> Option<usize> {
        match *self {
            ShapeClass::Fixed { rows, .. } | ShapeClass::FixedRows { rows } => Some(rows),
            _ => None,
        }
    }

    /// The fixed column count, if the contract has one.
    pub fn fixed_cols(&self) -> Option<usize> {
        match *self {
            ShapeClass::Fixed { cols, .. } | ShapeClass::FixedCols { cols } => Some(cols),
            _ => None,
        }
    }

    /// Whether a runtime shape satisfies this contract.
    pub fn admits(&self, rows: usize, cols: usize) -> bool {
        match *self {
            ShapeClass::Fixed { rows: r, cols: c } => rows == r && cols == c,
            ShapeClass::FixedRows { rows: r } => rows == r,
            ShapeClass::FixedCols { cols: c } => cols == c,
            ShapeClass::Dynamic => true,
            ShapeClass::Vector { len: Some(n) } => {
                (rows == n && cols == 1) || (rows == 1 && cols == n)
            }
            ShapeClass::Vector { len: None } => rows == 1 || cols == 1,
        }
    }
}

impl fmt::Display for ShapeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ShapeClass::Fixed { rows, cols } => write!(f, "{}x{}", rows, cols),
            ShapeClass::FixedRows { rows } => write!(f, "{}xdyn", rows),
            ShapeClass::FixedCols { cols } => write!(f, "dynx{}", cols),
            ShapeClass::Dynamic => write!(f, "dynxdyn"),
            ShapeClass::Vector { len: Some(n) } => write!(f, "vec{}", n),
            ShapeClass::Vector { len: None } => write!(f, "vecdyn"),
        }
    }
}

/// Identity of a registrable native dense type: an element kind plus a
/// shape contract. Used as half of the converter registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeType {
    /// Element kind
    pub element: ElementType,
    /// Dimensionality contract
    pub shape: ShapeClass,
}

impl NativeType {
    /// Describe a native type.
    pub fn new(element: ElementType, shape: ShapeClass) -> Self {
        Self { element, shape }
    }

    /// Fully dynamic matrix of the given element kind.
    pub fn dynamic(element: ElementType) -> Self {
        Self::new(element, ShapeClass::Dynamic)
    }

    /// Fixed-size matrix of the given element kind.
    pub fn fixed(element: ElementType, rows: usize, cols: usize) -> Self {
        Self::new(element, ShapeClass::Fixed { rows, cols })
    }

    /// Fixed-length vector of the given element kind.
    pub fn vector(element: ElementType, len: usize) -> Self {
        Self::new(element, ShapeClass::Vector { len: Some(len) })
    }

    /// Dynamically sized vector of the given element kind.
    pub fn dynamic_vector(element: ElementType) -> Self {
        Self::new(element, ShapeClass::Vector { len: None })
    }
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.element, self.shape)
    }
}
