//! Bidirectional Converter Registry
//!
//! Process-wide table of converter pairs keyed by (native type identity,
//! host type code). Registration runs once per concrete instantiation at
//! initialization time and is idempotent; the table is read-only afterward.
//! The two entry points model the host runtime's conversion dispatch:
//! [`convert_from_host`] fires when a host value is passed where a native
//! value is expected, [`convert_to_host`] when a native value crosses back.
//!
//! Both directions move data through a strided view in a single pass; the
//! from-host path leaves the caller-provided slot untouched unless the
//! whole conversion succeeds.

use std::collections::hash_map::Entry;
use std::sync::{OnceLock, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use rustc_hash::FxHashMap;
use tracing::debug;

use matriz_dense::{DenseMatrix, DenseValue, ElementType, NativeType, Scalar, ShapeClass};

use crate::construct::{constructor_for, Constructor};
use crate::dtype::{host_code, TypeCode};
use crate::error::{BridgeError, BridgeResult};
use crate::exception::register_exception;
use crate::host::HostValue;
use crate::ndarray::HostNdArray;
use crate::validate::check_convertible;
use crate::view::{map_array, map_array_mut};

type ToHostFn = Box<dyn Fn(&DenseValue) -> BridgeResult<HostValue> + Send + Sync>;
type FromHostFn = Box<dyn Fn(&HostValue, &mut Option<DenseValue>) -> BridgeResult<()> + Send + Sync>;

struct ConverterPair {
    to_host: ToHostFn,
    from_host: FromHostFn,
}

type ConverterKey = (NativeType, TypeCode);

static CONVERTERS: OnceLock<RwLock<FxHashMap<ConverterKey, ConverterPair>>> = OnceLock::new();

fn read_table() -> RwLockReadGuard<'static, FxHashMap<ConverterKey, ConverterPair>> {
    CONVERTERS
        .get_or_init(|| RwLock::new(FxHashMap::default()))
        .read()
        .unwrap_or_else(PoisonError::into_inner)
}

fn write_table() -> RwLockWriteGuard<'static, FxHashMap<ConverterKey, ConverterPair>> {
    CONVERTERS
        .get_or_init(|| RwLock::new(FxHashMap::default()))
        .write()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Register the converter pair for a native type under a host type code.
///
/// Idempotent per (type, code) pair: the first registration wins and later
/// calls are logged no-ops. Expected to run during initialization, before
/// any conversion traffic.
pub fn register(ty: NativeType, code: TypeCode) {
    let mut table = write_table();
    match table.entry((ty, code)) {
        Entry::Occupied(_) => {
            debug!("converter for {} / {} already registered", ty, code);
        }
        Entry::Vacant(slot) => {
            slot.insert(build_pair(&ty));
            debug!("registered converter for {} / {}", ty, code);
        }
    }
}

/// Whether a converter pair is registered for the given key.
pub fn is_registered(ty: &NativeType, code: TypeCode) -> bool {
    read_table().contains_key(&(*ty, code))
}

/// Convert a native value into a freshly allocated host array.
pub fn convert_to_host(ty: &NativeType, value: &DenseValue) -> BridgeResult<HostValue> {
    let table = read_table();
    let pair = table
        .get(&(*ty, host_code(ty.element)))
        .ok_or_else(|| BridgeError::unregistered(ty.to_string(), host_code(ty.element).name()))?;
    (pair.to_host)(value)
}

/// Convert a host value into a native value constructed in `storage`.
///
/// `storage` is written only after the conversion has fully succeeded.
pub fn convert_from_host(
    ty: &NativeType,
    value: &HostValue,
    storage: &mut Option<DenseValue>,
) -> BridgeResult<()> {
    let table = read_table();
    let pair = table
        .get(&(*ty, host_code(ty.element)))
        .ok_or_else(|| BridgeError::unregistered(ty.to_string(), host_code(ty.element).name()))?;
    (pair.from_host)(value, storage)
}

/// Register the exception bridge and the standard instantiation set:
/// the fully dynamic `f64` matrix, fixed 2x2/3x3/4x4 matrices, the dynamic
/// `f64` vector, and fixed vectors of length 2/3/4. Idempotent.
pub fn install_default_conversions() {
    register_exception();

    let standard = [
        NativeType::dynamic(ElementType::F64),
        NativeType::fixed(ElementType::F64, 2, 2),
        NativeType::fixed(ElementType::F64, 3, 3),
        NativeType::fixed(ElementType::F64, 4, 4),
        NativeType::dynamic_vector(ElementType::F64),
        NativeType::vector(ElementType::F64, 2),
        NativeType::vector(ElementType::F64, 3),
        NativeType::vector(ElementType::F64, 4),
    ];
    for ty in standard {
        register(ty, host_code(ty.element));
    }
}

fn build_pair(ty: &NativeType) -> ConverterPair {
    match ty.element {
        ElementType::F64 => pair_for::<f64>(ty.shape),
        ElementType::F32 => pair_for::<f32>(ty.shape),
        ElementType::I32 => pair_for::<i32>(ty.shape),
    }
}

fn pair_for<T: Scalar>(shape: ShapeClass) -> ConverterPair {
    let ty = NativeType::new(T::ELEMENT, shape);
    let ctor: Constructor<T> = constructor_for(&shape);

    let to_host: ToHostFn = Box::new(move |value| {
        let matrix = T::from_value(value).ok_or_else(|| {
            BridgeError::element_type_mismatch(T::ELEMENT.name(), value.element().name())
        })?;
        to_host_array(matrix, &shape)
    });

    let from_host: FromHostFn = Box::new(move |value, storage| {
        check_convertible(value, &ty)?;
        let array = value
            .as_array()
            .ok_or_else(|| BridgeError::not_an_array(value.type_name()))?;
        let matrix = from_host_array(array, &shape, &ctor)?;
        *storage = Some(T::into_value(matrix));
        Ok(())
    });

    ConverterPair { to_host, from_host }
}

/// Allocate a host array shaped like the value and fill it through a view
/// in one pass.
fn to_host_array<T: Scalar>(matrix: &DenseMatrix<T>, shape: &ShapeClass) -> BridgeResult<HostValue> {
    let array = HostNdArray::alloc(&[matrix.rows(), matrix.cols()], host_code(T::ELEMENT))?;
    map_array_mut::<T, _>(&array, shape, |view| {
        let (rows, cols) = view.shape();
        for row in 0..rows {
            for col in 0..cols {
                view.set(row, col, matrix[(row, col)]);
            }
        }
    })?;
    Ok(HostValue::Array(array))
}

/// Construct a native value of the right runtime shape and assign the view
/// contents into it in one pass.
fn from_host_array<T: Scalar>(
    array: &HostNdArray,
    shape: &ShapeClass,
    ctor: &Constructor<T>,
) -> BridgeResult<DenseMatrix<T>> {
    map_array::<T, _>(array, shape, |view| {
        let (rows, cols) = view.shape();
        let mut matrix = ctor(rows, cols);
        for row in 0..rows {
            for col in 0..cols {
                matrix[(row, col)] = view.get(row, col);
            }
        }
        matrix
    })
}
