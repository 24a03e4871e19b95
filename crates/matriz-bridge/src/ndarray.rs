//! Host N-Dimensional Array
//!
//! Buffer-backed model of the host runtime's array object, carrying
//! exactly the surface the bridge consumes: dimensionality, extents,
//! per-dimension byte strides, item size, element-type code, aligned flag,
//! and the shared byte buffer itself.
//!
//! ## Memory Layout
//!
//! Fresh allocations are C-contiguous (row-major). Step-slicing multiplies
//! strides while sharing the buffer, which is how non-contiguous arrays
//! reach the bridge in tests; the bridge itself never assumes contiguity.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use matriz_dense::Scalar;

use crate::dtype::{host_code, TypeCode};
use crate::error::{BridgeError, BridgeResult};

/// Transient snapshot of a host array's buffer metadata.
///
/// Read from the live array at conversion time and dropped with the call;
/// only the first `ndim` entries of `extents` and `byte_strides` are
/// meaningful.
#[derive(Debug, Clone, Copy)]
pub struct BufferDescriptor {
    /// Number of dimensions (1 or 2)
    pub ndim: usize,
    /// Extent per dimension
    pub extents: [usize; 2],
    /// Byte stride per dimension
    pub byte_strides: [isize; 2],
    /// Size of one element in bytes
    pub item_size: usize,
    /// Element-type code of the buffer
    pub type_code: TypeCode,
    /// Whether the host runtime marks the buffer aligned
    pub aligned: bool,
}

/// Host runtime n-dimensional array (1 or 2 dimensions).
///
/// Cloning shares the underlying buffer, as host references do.
#[derive(Debug, Clone)]
pub struct HostNdArray {
    shape: Vec<usize>,
    strides: Vec<isize>,
    type_code: TypeCode,
    aligned: bool,
    data: Rc<RefCell<Vec<u8>>>,
}

impl HostNdArray {
    /// Allocate a fresh, zeroed, C-contiguous array.
    pub fn alloc(shape: &[usize], type_code: TypeCode) -> BridgeResult<Self> {
        if shape.is_empty() || shape.len() > 2 {
            return Err(BridgeError::allocation_failure(format!(
                "only 1- and 2-dimensional arrays are supported, got {} dimensions",
                shape.len()
            )));
        }

        let item_size = type_code.item_size();
        let mut nbytes = item_size;
        for &dim in shape {
            nbytes = nbytes.checked_mul(dim).ok_or_else(|| {
                BridgeError::allocation_failure(format!("size overflow for shape {:?}", shape))
            })?;
        }

        // C order: last dimension varies fastest
        let mut strides = Vec::with_capacity(shape.len());
        let mut stride = item_size as isize;
        for &dim in shape.iter().rev() {
            strides.push(stride);
            stride *= dim as isize;
        }
        strides.reverse();

        Ok(Self {
            shape: shape.to_vec(),
            strides,
            type_code,
            aligned: true,
            data: Rc::new(RefCell::new(vec![0; nbytes])),
        })
    }

    /// Allocate and fill from a typed slice in C order.
    pub fn from_slice<T: Scalar>(values: &[T], shape: &[usize]) -> BridgeResult<Self> {
        let arr = Self::alloc(shape, host_code(T::ELEMENT))?;
        if values.len() != arr.len() {
            return Err(BridgeError::shape_mismatch(format!(
                "{} elements do not fill shape {:?}",
                values.len(),
                shape
            )));
        }

        let item_size = arr.item_size();
        arr.write_data(|bytes| {
            for (i, &v) in values.iter().enumerate() {
                v.write_bytes(&mut bytes[i * item_size..]);
            }
        });
        Ok(arr)
    }

    /// Number of dimensions.
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Extents per dimension.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Byte strides per dimension.
    pub fn byte_strides(&self) -> &[isize] {
        &self.strides
    }

    /// Element-type code of the buffer.
    pub fn type_code(&self) -> TypeCode {
        self.type_code
    }

    /// Size of one element in bytes.
    pub fn item_size(&self) -> usize {
        self.type_code.item_size()
    }

    /// Whether the host runtime marks this buffer aligned.
    pub fn is_aligned(&self) -> bool {
        self.aligned
    }

    /// Set the aligned flag. The host runtime owns this flag; the model
    /// exposes it so misaligned buffers can be represented.
    pub fn set_aligned(&mut self, aligned: bool) {
        self.aligned = aligned;
    }

    /// Total number of elements.
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    /// Whether the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// View every `step`-th element per dimension, sharing the buffer.
    pub fn step_slice(&self, steps: &[usize]) -> BridgeResult<Self> {
        if steps.len() != self.ndim() {
            return Err(BridgeError::shape_mismatch(format!(
                "{} step values for {} dimensions",
                steps.len(),
                self.ndim()
            )));
        }
        if steps.iter().any(|&s| s == 0) {
            return Err(BridgeError::shape_mismatch("slice step must be at least 1"));
        }

        let shape: Vec<usize> = self
            .shape
            .iter()
            .zip(steps)
            .map(|(&dim, &step)| dim.div_ceil(step))
            .collect();
        let strides: Vec<isize> = self
            .strides
            .iter()
            .zip(steps)
            .map(|(&stride, &step)| stride * step as isize)
            .collect();

        Ok(Self {
            shape,
            strides,
            type_code: self.type_code,
            aligned: self.aligned,
            data: Rc::clone(&self.data),
        })
    }

    /// Snapshot the buffer metadata for this call.
    pub fn descriptor(&self) -> BufferDescriptor {
        let mut extents = [0usize; 2];
        let mut byte_strides = [0isize; 2];
        for dim in 0..self.ndim() {
            extents[dim] = self.shape[dim];
            byte_strides[dim] = self.strides[dim];
        }

        BufferDescriptor {
            ndim: self.ndim(),
            extents,
            byte_strides,
            item_size: self.item_size(),
            type_code: self.type_code,
            aligned: self.aligned,
        }
    }

    /// Strided read of one element, if the indices and element type fit.
    pub fn element<T: Scalar>(&self, indices: &[usize]) -> Option<T> {
        if host_code(T::ELEMENT) != self.type_code || indices.len() != self.ndim() {
            return None;
        }
        for (idx, dim) in indices.iter().zip(self.shape.iter()) {
            if idx >= dim {
                return None;
            }
        }

        let byte: isize = indices
            .iter()
            .zip(self.strides.iter())
            .map(|(&idx, &stride)| idx as isize * stride)
            .sum();
        let start = byte as usize;
        Some(self.read_data(|bytes| T::from_bytes(&bytes[start..start + self.item_size()])))
    }

    /// Strided write of one element; `true` when the indices and element
    /// type fit.
    pub fn set_element<T: Scalar>(&self, indices: &[usize], value: T) -> bool {
        if self.element::<T>(indices).is_none() {
            return false;
        }
        let byte: isize = indices
            .iter()
            .zip(self.strides.iter())
            .map(|(&idx, &stride)| idx as isize * stride)
            .sum();
        let start = byte as usize;
        self.write_data(|bytes| value.write_bytes(&mut bytes[start..]));
        true
    }

    /// Read access to the raw buffer for the duration of the closure.
    pub fn read_data<R>(&self, f: impl FnOnce(&[u8]) -> R) -> R {
        let guard = self.data.borrow();
        f(&guard)
    }

    /// Write access to the raw buffer for the duration of the closure.
    pub fn write_data<R>(&self, f: impl FnOnce(&mut [u8]) -> R) -> R {
        let mut guard = self.data.borrow_mut();
        f(&mut guard)
    }
}

impl fmt::Display for HostNdArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<ndarray shape={:?} dtype={}>",
            self.shape, self.type_code
        )
    }
}
