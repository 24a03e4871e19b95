//! # matriz-bridge
//!
//! Bidirectional, zero-copy bridging between the matriz dense value types
//! and a host runtime's n-dimensional array object.
//!
//! ## Overview
//!
//! The bridge moves dense values across the runtime boundary without
//! copying through intermediate buffers:
//!
//! - a **validator** decides, without raising, whether a host value can
//!   become a given native type (buffer-ness, dimensionality, element
//!   code, alignment);
//! - a **strided view builder** exposes a host buffer as a typed,
//!   element-stride view that both conversion directions read and write
//!   in place;
//! - a **constructor selector** picks the construction arity matching the
//!   native type's shape contract, once, at registration time;
//! - a **converter registry** wires the three into a to-host / from-host
//!   pair per registered (native type, host type code);
//! - an **exception bridge** turns native errors that reach the boundary
//!   into host exception objects that preserve the message verbatim.
//!
//! ## Usage
//!
//! ```
//! use matriz_bridge::{convert_from_host, convert_to_host, install_default_conversions};
//! use matriz_dense::{DenseMatrix, DenseValue, ElementType, NativeType};
//!
//! install_default_conversions();
//!
//! let ty = NativeType::dynamic(ElementType::F64);
//! let value = DenseValue::from(DenseMatrix::from_vec(2, 3, vec![1.0; 6]).unwrap());
//!
//! let host = convert_to_host(&ty, &value).unwrap();
//! let mut storage = None;
//! convert_from_host(&ty, &host, &mut storage).unwrap();
//! assert_eq!(storage, Some(value));
//! ```
//!
//! ## Resource Model
//!
//! Conversions are synchronous and call-scoped. Views and buffer
//! descriptors never outlive the conversion that produced them; the
//! registry and the registered exception type are the only process-wide
//! state, written during initialization and read-only afterward.
//!
//! ## Module Structure
//!
//! - [`dtype`]: host element-type codes and the element bijection
//! - [`host`]: the host runtime's value surface
//! - [`ndarray`]: the host array object and its buffer descriptor
//! - [`view`]: layout resolution and call-scoped strided views
//! - [`validate`]: the convertibility gate
//! - [`registry`]: converter registration and the conversion entry points
//! - [`exception`]: the cross-runtime exception bridge
//! - [`error`]: error types

pub mod dtype;
pub mod error;
pub mod exception;
pub mod host;
pub mod ndarray;
pub mod registry;
pub mod validate;
pub mod view;

mod construct;

// Re-export main types for convenience
pub use dtype::{element_for, host_code, TypeCode};
pub use error::{BridgeError, BridgeResult};
pub use exception::{at_boundary, register_exception, to_host_exception};
pub use host::{HostObject, HostValue};
pub use ndarray::{BufferDescriptor, HostNdArray};
pub use registry::{
    convert_from_host, convert_to_host, install_default_conversions, is_registered, register,
};
pub use validate::{check_convertible, is_convertible};
pub use view::{map_array, map_array_mut, StridedView, StridedViewMut, ViewLayout};
