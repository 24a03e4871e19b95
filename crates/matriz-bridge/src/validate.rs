//! Type/Shape Validator
//!
//! The sole gate in front of the view builder. [`is_convertible`] is the
//! cheap boolean probe the host dispatch uses to decide whether a converter
//! applies; it never raises, and its only side effect is a `debug!` event
//! naming the rejection reason. [`check_convertible`] is the same gate with
//! each failure observable as a distinct error, and is what the from-host
//! conversion re-runs defensively before building any view.
//!
//! Checks run in order and short-circuit on the first failure:
//!
//! 1. the value is an array-like buffer at all;
//! 2. it has 2 dimensions, or 1 dimension against a vector target;
//! 3. its element-type code equals the target's code exactly;
//! 4. its memory is marked aligned.
//!
//! Fixed-extent disagreement is deliberately not checked here; the view
//! builder raises it during conversion.

use tracing::debug;

use matriz_dense::NativeType;

use crate::dtype::host_code;
use crate::error::{BridgeError, BridgeResult};
use crate::host::HostValue;

/// Whether a host value can convert to the given native type.
pub fn is_convertible(value: &HostValue, ty: &NativeType) -> bool {
    match check_convertible(value, ty) {
        Ok(()) => true,
        Err(err) => {
            debug!("host value rejected for {}: {}", ty, err);
            false
        }
    }
}

/// The validation gate with observable failures.
pub fn check_convertible(value: &HostValue, ty: &NativeType) -> BridgeResult<()> {
    let array = match value {
        HostValue::Array(array) => array,
        other => return Err(BridgeError::not_an_array(other.type_name())),
    };

    let ndim = array.ndim();
    if ndim != 2 && !(ndim == 1 && ty.shape.is_vector()) {
        return Err(BridgeError::DimensionMismatch {
            ndim,
            target: ty.to_string(),
        });
    }

    let expected = host_code(ty.element);
    if array.type_code() != expected {
        return Err(BridgeError::element_type_mismatch(
            expected.name(),
            array.type_code().name(),
        ));
    }

    if !array.is_aligned() {
        return Err(BridgeError::AlignmentUnsupported);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dtype::TypeCode;
    use crate::ndarray::HostNdArray;
    use matriz_dense::ElementType;

    fn f64_matrix_ty() -> NativeType {
        NativeType::dynamic(ElementType::F64)
    }

    #[test]
    fn test_rejects_non_array() {
        let err = check_convertible(&HostValue::Int(7), &f64_matrix_ty()).unwrap_err();
        assert_eq!(
            err,
            BridgeError::NotAnArray {
                actual: "int".to_string()
            }
        );
        assert!(!is_convertible(&HostValue::Str("x".into()), &f64_matrix_ty()));
    }

    #[test]
    fn test_rejects_wrong_dimensionality() {
        let one_d = HostNdArray::alloc(&[4], TypeCode::Float64).unwrap();
        let err = check_convertible(&HostValue::Array(one_d.clone()), &f64_matrix_ty()).unwrap_err();
        assert!(matches!(err, BridgeError::DimensionMismatch { ndim: 1, .. }));

        // the same 1-d buffer is fine against a vector target
        let vec_ty = NativeType::dynamic_vector(ElementType::F64);
        assert!(is_convertible(&HostValue::Array(one_d), &vec_ty));
    }

    #[test]
    fn test_rejects_element_code_mismatch() {
        let f32_arr = HostNdArray::alloc(&[2, 2], TypeCode::Float32).unwrap();
        let err = check_convertible(&HostValue::Array(f32_arr), &f64_matrix_ty()).unwrap_err();
        assert_eq!(
            err,
            BridgeError::ElementTypeMismatch {
                expected: "float64".to_string(),
                actual: "float32".to_string()
            }
        );
    }

    #[test]
    fn test_rejects_unaligned_buffer() {
        let mut arr = HostNdArray::alloc(&[2, 2], TypeCode::Float64).unwrap();
        arr.set_aligned(false);
        let err = check_convertible(&HostValue::Array(arr), &f64_matrix_ty()).unwrap_err();
        assert_eq!(err, BridgeError::AlignmentUnsupported);
    }

    #[test]
    fn test_does_not_check_fixed_extents() {
        // extent conflicts surface in the view builder, not here
        let arr = HostNdArray::alloc(&[2, 2], TypeCode::Float64).unwrap();
        let fixed = NativeType::fixed(ElementType::F64, 3, 3);
        assert!(is_convertible(&HostValue::Array(arr), &fixed));
    }

    #[test]
    fn test_accepts_matching_array() {
        let arr = HostNdArray::alloc(&[3, 5], TypeCode::Float64).unwrap();
        assert!(check_convertible(&HostValue::Array(arr), &f64_matrix_ty()).is_ok());
    }
}
