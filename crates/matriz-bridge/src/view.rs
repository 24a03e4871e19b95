//! Strided Views over Host Buffers
//!
//! A conversion never copies through an intermediate buffer: it reads or
//! writes the host array in place through a typed, element-stride view.
//! Views are non-owning and strictly call-scoped: they can only be
//! obtained through [`map_array`] / [`map_array_mut`], which borrow the
//! buffer for the duration of a closure, so no view survives the
//! conversion that built it.
//!
//! ## Layout Resolution
//!
//! Two algorithms, selected by the target shape contract:
//!
//! - **2-D**: rows and columns come straight from the buffer extents, and
//!   each byte stride divides by the item size to give an element stride.
//!   A fixed contract dimension that disagrees with the observed extent is
//!   a shape error.
//! - **Vector**: orientation is resolved from the buffer, not the type. A
//!   1-d buffer binds directly; for a 2-d buffer the dimension with the
//!   larger extent is the vector length (ties resolve to dimension 0), so
//!   1xN and Nx1 buffers bind to the same vector type transparently.

use std::marker::PhantomData;

use matriz_dense::{Scalar, ShapeClass};

use crate::dtype::host_code;
use crate::error::{BridgeError, BridgeResult};
use crate::ndarray::{BufferDescriptor, HostNdArray};

/// Resolved element-stride geometry of a view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLayout {
    /// Full 2-D layout with independent row and column strides
    Matrix {
        rows: usize,
        cols: usize,
        row_stride: isize,
        col_stride: isize,
    },
    /// Vector layout with a single inner stride, orientation pre-resolved
    Vector { len: usize, stride: isize },
}

impl ViewLayout {
    /// Shape of the viewed region as (rows, cols); vectors are columns.
    pub fn shape(&self) -> (usize, usize) {
        match *self {
            ViewLayout::Matrix { rows, cols, .. } => (rows, cols),
            ViewLayout::Vector { len, .. } => (len, 1),
        }
    }
}

/// Resolve the view geometry for a buffer against a shape contract.
///
/// The buffer is expected to have passed validation for this contract;
/// fixed-extent disagreement surfaces here as a shape error.
pub fn resolve_layout(desc: &BufferDescriptor, shape: &ShapeClass) -> BridgeResult<ViewLayout> {
    match *shape {
        ShapeClass::Vector { len } => resolve_vector(desc, len),
        _ => resolve_matrix(desc, shape),
    }
}

fn resolve_matrix(desc: &BufferDescriptor, shape: &ShapeClass) -> BridgeResult<ViewLayout> {
    if desc.ndim != 2 {
        return Err(BridgeError::shape_mismatch(format!(
            "a 2-dimensional buffer is required, got {} dimensions",
            desc.ndim
        )));
    }

    let (rows, cols) = (desc.extents[0], desc.extents[1]);
    if let Some(fixed) = shape.fixed_rows() {
        if fixed != rows {
            return Err(BridgeError::shape_mismatch(format!(
                "the number of rows does not fit the target type: expected {}, got {}",
                fixed, rows
            )));
        }
    }
    if let Some(fixed) = shape.fixed_cols() {
        if fixed != cols {
            return Err(BridgeError::shape_mismatch(format!(
                "the number of columns does not fit the target type: expected {}, got {}",
                fixed, cols
            )));
        }
    }

    Ok(ViewLayout::Matrix {
        rows,
        cols,
        row_stride: elem_stride(desc.byte_strides[0], desc.item_size)?,
        col_stride: elem_stride(desc.byte_strides[1], desc.item_size)?,
    })
}

fn resolve_vector(desc: &BufferDescriptor, fixed_len: Option<usize>) -> BridgeResult<ViewLayout> {
    // Ties (including 1x1) resolve to dimension 0.
    let axis = match desc.ndim {
        1 => 0,
        2 => usize::from(desc.extents[1] > desc.extents[0]),
        n => {
            return Err(BridgeError::shape_mismatch(format!(
                "a vector target requires a 1- or 2-dimensional buffer, got {} dimensions",
                n
            )))
        }
    };

    let len = desc.extents[axis];
    if let Some(fixed) = fixed_len {
        if fixed != len {
            return Err(BridgeError::shape_mismatch(format!(
                "the number of elements does not fit the vector type: expected {}, got {}",
                fixed, len
            )));
        }
    }

    Ok(ViewLayout::Vector {
        len,
        stride: elem_stride(desc.byte_strides[axis], desc.item_size)?,
    })
}

fn elem_stride(byte_stride: isize, item_size: usize) -> BridgeResult<isize> {
    let item = item_size as isize;
    if item == 0 || byte_stride % item != 0 {
        return Err(BridgeError::shape_mismatch(format!(
            "byte stride {} is not a multiple of the item size {}",
            byte_stride, item_size
        )));
    }
    Ok(byte_stride / item)
}

/// Non-owning read view typed as the native element.
pub struct StridedView<'buf, T: Scalar> {
    layout: ViewLayout,
    bytes: &'buf [u8],
    _elem: PhantomData<T>,
}

impl<'buf, T: Scalar> StridedView<'buf, T> {
    fn new(layout: ViewLayout, bytes: &'buf [u8]) -> Self {
        Self {
            layout,
            bytes,
            _elem: PhantomData,
        }
    }

    /// Shape of the view as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.layout.shape()
    }

    /// Resolved geometry.
    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    /// Element at (row, col), read through the strides.
    pub fn get(&self, row: usize, col: usize) -> T {
        let start = byte_offset::<T>(&self.layout, row, col);
        T::from_bytes(&self.bytes[start..start + T::ELEMENT.size_of()])
    }
}

/// Non-owning write view typed as the native element.
pub struct StridedViewMut<'buf, T: Scalar> {
    layout: ViewLayout,
    bytes: &'buf mut [u8],
    _elem: PhantomData<T>,
}

impl<'buf, T: Scalar> StridedViewMut<'buf, T> {
    fn new(layout: ViewLayout, bytes: &'buf mut [u8]) -> Self {
        Self {
            layout,
            bytes,
            _elem: PhantomData,
        }
    }

    /// Shape of the view as (rows, cols).
    pub fn shape(&self) -> (usize, usize) {
        self.layout.shape()
    }

    /// Write an element at (row, col) through the strides.
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let start = byte_offset::<T>(&self.layout, row, col);
        value.write_bytes(&mut self.bytes[start..]);
    }
}

fn byte_offset<T: Scalar>(layout: &ViewLayout, row: usize, col: usize) -> usize {
    let elem = match *layout {
        ViewLayout::Matrix {
            rows,
            cols,
            row_stride,
            col_stride,
        } => {
            debug_assert!(row < rows && col < cols);
            row as isize * row_stride + col as isize * col_stride
        }
        ViewLayout::Vector { len, stride } => {
            debug_assert!(row < len && col == 0);
            row as isize * stride
        }
    };
    debug_assert!(elem >= 0);
    elem as usize * T::ELEMENT.size_of()
}

/// Borrow a read view over a host array for the duration of a closure.
///
/// Re-checks the element code before any view exists; layout resolution
/// failures (fixed-extent conflicts, indivisible strides) surface as
/// errors.
pub fn map_array<T: Scalar, R>(
    array: &HostNdArray,
    shape: &ShapeClass,
    f: impl FnOnce(&StridedView<'_, T>) -> R,
) -> BridgeResult<R> {
    let desc = array.descriptor();
    let expected = host_code(T::ELEMENT);
    if desc.type_code != expected {
        return Err(BridgeError::element_type_mismatch(
            expected.name(),
            desc.type_code.name(),
        ));
    }
    let layout = resolve_layout(&desc, shape)?;
    Ok(array.read_data(|bytes| f(&StridedView::new(layout, bytes))))
}

/// Borrow a write view over a host array for the duration of a closure.
pub fn map_array_mut<T: Scalar, R>(
    array: &HostNdArray,
    shape: &ShapeClass,
    f: impl FnOnce(&mut StridedViewMut<'_, T>) -> R,
) -> BridgeResult<R> {
    let desc = array.descriptor();
    let expected = host_code(T::ELEMENT);
    if desc.type_code != expected {
        return Err(BridgeError::element_type_mismatch(
            expected.name(),
            desc.type_code.name(),
        ));
    }
    let layout = resolve_layout(&desc, shape)?;
    Ok(array.write_data(|bytes| f(&mut StridedViewMut::new(layout, bytes))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn desc_2d(extents: [usize; 2], byte_strides: [isize; 2], item_size: usize) -> BufferDescriptor {
        BufferDescriptor {
            ndim: 2,
            extents,
            byte_strides,
            item_size,
            type_code: crate::dtype::TypeCode::Float64,
            aligned: true,
        }
    }

    #[test]
    fn test_matrix_layout_element_strides() {
        let desc = desc_2d([3, 4], [32, 8], 8);
        let layout = resolve_layout(&desc, &ShapeClass::Dynamic).unwrap();
        assert_eq!(
            layout,
            ViewLayout::Matrix {
                rows: 3,
                cols: 4,
                row_stride: 4,
                col_stride: 1
            }
        );
        assert_eq!(layout.shape(), (3, 4));
    }

    #[test]
    fn test_matrix_layout_enforces_fixed_extents() {
        let desc = desc_2d([2, 2], [16, 8], 8);
        let err = resolve_layout(&desc, &ShapeClass::Fixed { rows: 3, cols: 2 }).unwrap_err();
        assert!(matches!(err, BridgeError::ShapeMismatch { .. }));
        assert!(err.to_string().contains("rows"));

        let err = resolve_layout(&desc, &ShapeClass::FixedCols { cols: 5 }).unwrap_err();
        assert!(err.to_string().contains("columns"));

        assert!(resolve_layout(&desc, &ShapeClass::Fixed { rows: 2, cols: 2 }).is_ok());
    }

    #[test]
    fn test_matrix_layout_requires_two_dims() {
        let desc = BufferDescriptor {
            ndim: 1,
            extents: [4, 0],
            byte_strides: [8, 0],
            item_size: 8,
            type_code: crate::dtype::TypeCode::Float64,
            aligned: true,
        };
        assert!(resolve_layout(&desc, &ShapeClass::Dynamic).is_err());
    }

    #[test]
    fn test_vector_layout_from_one_dim() {
        let desc = BufferDescriptor {
            ndim: 1,
            extents: [5, 0],
            byte_strides: [16, 0],
            item_size: 8,
            type_code: crate::dtype::TypeCode::Float64,
            aligned: true,
        };
        let layout = resolve_layout(&desc, &ShapeClass::Vector { len: None }).unwrap();
        assert_eq!(layout, ViewLayout::Vector { len: 5, stride: 2 });
        assert_eq!(layout.shape(), (5, 1));
    }

    #[test]
    fn test_vector_orientation_from_extents() {
        // 1x5 row buffer binds along dimension 1
        let row = desc_2d([1, 5], [40, 8], 8);
        let layout = resolve_layout(&row, &ShapeClass::Vector { len: None }).unwrap();
        assert_eq!(layout, ViewLayout::Vector { len: 5, stride: 1 });

        // 5x1 column buffer binds along dimension 0
        let col = desc_2d([5, 1], [8, 8], 8);
        let layout = resolve_layout(&col, &ShapeClass::Vector { len: None }).unwrap();
        assert_eq!(layout, ViewLayout::Vector { len: 5, stride: 1 });
    }

    #[test]
    fn test_vector_tie_break_uses_dimension_zero() {
        let square = desc_2d([1, 1], [8, 8], 8);
        let layout = resolve_layout(&square, &ShapeClass::Vector { len: None }).unwrap();
        assert_eq!(layout, ViewLayout::Vector { len: 1, stride: 1 });
    }

    #[test]
    fn test_vector_layout_enforces_fixed_length() {
        let desc = desc_2d([1, 5], [40, 8], 8);
        let err = resolve_layout(&desc, &ShapeClass::Vector { len: Some(4) }).unwrap_err();
        assert!(matches!(err, BridgeError::ShapeMismatch { .. }));
        assert!(resolve_layout(&desc, &ShapeClass::Vector { len: Some(5) }).is_ok());
    }

    #[test]
    fn test_indivisible_stride_is_rejected() {
        let desc = desc_2d([2, 2], [17, 8], 8);
        let err = resolve_layout(&desc, &ShapeClass::Dynamic).unwrap_err();
        assert!(err.to_string().contains("multiple of the item size"));
    }

    #[test]
    fn test_map_array_rejects_element_mismatch() {
        let arr = HostNdArray::from_slice(&[1.0f32, 2.0], &[2]).unwrap();
        let err = map_array::<f64, _>(&arr, &ShapeClass::Vector { len: None }, |_| ()).unwrap_err();
        assert!(matches!(err, BridgeError::ElementTypeMismatch { .. }));
    }

    #[test]
    fn test_map_array_reads_through_strides() {
        let data: Vec<i32> = (0..12).collect();
        let arr = HostNdArray::from_slice(&data, &[3, 4]).unwrap();
        let sliced = arr.step_slice(&[1, 2]).unwrap();

        let collected = map_array::<i32, _>(&sliced, &ShapeClass::Dynamic, |view| {
            let (rows, cols) = view.shape();
            let mut out = Vec::new();
            for r in 0..rows {
                for c in 0..cols {
                    out.push(view.get(r, c));
                }
            }
            out
        })
        .unwrap();

        assert_eq!(collected, vec![0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_map_array_mut_writes_in_place() {
        let arr = HostNdArray::alloc(&[2, 2], crate::dtype::TypeCode::Float64).unwrap();
        map_array_mut::<f64, _>(&arr, &ShapeClass::Dynamic, |view| {
            view.set(0, 1, 2.5);
            view.set(1, 0, -1.0);
        })
        .unwrap();

        assert_eq!(arr.element::<f64>(&[0, 1]), Some(2.5));
        assert_eq!(arr.element::<f64>(&[1, 0]), Some(-1.0));
    }
}
