//! Error Types for the Bridge
//!
//! ## Error Categories
//!
//! - Convertibility failures (not an array, dimensionality, element type,
//!   alignment): the validator reports these as a boolean probe; the
//!   from-host conversion raises them
//! - Shape failures (observed extent against a fixed contract dimension)
//! - Host allocation failures on the to-host path
//! - Registry misuse (conversion requested for an unregistered pair)
//!
//! The exception bridge preserves any of these across the boundary as a
//! host exception carrying the display string verbatim.

use thiserror::Error;

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Bridge error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    /// The host value at the boundary is not an array-like buffer
    #[error("the host object is not an array: got {actual}")]
    NotAnArray {
        /// Host type name of the offending value
        actual: String,
    },

    /// Array dimensionality is unsupported for the target type
    #[error("a {ndim}-dimensional array cannot convert to {target}")]
    DimensionMismatch {
        /// Observed number of dimensions
        ndim: usize,
        /// Display form of the target native type
        target: String,
    },

    /// Observed extent conflicts with a fixed contract dimension
    #[error("shape mismatch: {reason}")]
    ShapeMismatch {
        /// Description of the conflict
        reason: String,
    },

    /// Host element-type code does not match the target element kind
    #[error("element type mismatch: expected {expected}, got {actual}")]
    ElementTypeMismatch {
        /// Expected element kind
        expected: String,
        /// Observed host type code
        actual: String,
    },

    /// Host buffer is not marked aligned; no unaligned fallback exists
    #[error("unaligned host buffers are not supported")]
    AlignmentUnsupported,

    /// Could not allocate the destination host array
    #[error("host array allocation failed: {reason}")]
    AllocationFailure {
        /// Description of the failure
        reason: String,
    },

    /// Conversion requested for a pair that was never registered
    #[error("no converter registered for {native} with host code {code}")]
    Unregistered {
        /// Display form of the native type
        native: String,
        /// Host type code name
        code: String,
    },

    /// Error with a verbatim message
    #[error("{0}")]
    Custom(String),
}

impl BridgeError {
    /// Create a not-an-array error
    pub fn not_an_array(actual: impl Into<String>) -> Self {
        BridgeError::NotAnArray {
            actual: actual.into(),
        }
    }

    /// Create a shape mismatch error
    pub fn shape_mismatch(reason: impl Into<String>) -> Self {
        BridgeError::ShapeMismatch {
            reason: reason.into(),
        }
    }

    /// Create an element type mismatch error
    pub fn element_type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        BridgeError::ElementTypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create an allocation failure error
    pub fn allocation_failure(reason: impl Into<String>) -> Self {
        BridgeError::AllocationFailure {
            reason: reason.into(),
        }
    }

    /// Create an unregistered-pair error
    pub fn unregistered(native: impl Into<String>, code: impl Into<String>) -> Self {
        BridgeError::Unregistered {
            native: native.into(),
            code: code.into(),
        }
    }

    /// Create an error carrying a verbatim message
    pub fn custom(message: impl Into<String>) -> Self {
        BridgeError::Custom(message.into())
    }

    /// Check if this is a convertibility rejection (the kinds the validator
    /// reports as `false`)
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            BridgeError::NotAnArray { .. }
                | BridgeError::DimensionMismatch { .. }
                | BridgeError::ElementTypeMismatch { .. }
                | BridgeError::AlignmentUnsupported
        )
    }

    /// Check if this is a shape-related error
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            BridgeError::DimensionMismatch { .. } | BridgeError::ShapeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = BridgeError::element_type_mismatch("f64", "float32");
        assert_eq!(
            err.to_string(),
            "element type mismatch: expected f64, got float32"
        );

        let err = BridgeError::custom("dimension mismatch");
        assert_eq!(err.to_string(), "dimension mismatch");
    }

    #[test]
    fn test_classification() {
        assert!(BridgeError::AlignmentUnsupported.is_rejection());
        assert!(BridgeError::not_an_array("int").is_rejection());
        assert!(!BridgeError::shape_mismatch("2 != 3").is_rejection());
        assert!(BridgeError::shape_mismatch("2 != 3").is_shape_error());
        assert!(!BridgeError::custom("boom").is_shape_error());
    }
}
