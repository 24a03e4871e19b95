//! Host Runtime Value Surface
//!
//! The host runtime hands arbitrary values to the boundary, not just
//! arrays. This module models the slice of its object model the bridge
//! consumes: a closed value enum (so the validator can reject a non-array
//! outright) and an opaque attribute-carrying object, which is also how
//! host exceptions are materialized.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::ndarray::HostNdArray;

/// A host-runtime value as seen at the boundary.
#[derive(Debug, Clone)]
pub enum HostValue {
    /// Host `none`/`null`
    None,
    /// Host boolean
    Bool(bool),
    /// Host integer
    Int(i64),
    /// Host float
    Float(f64),
    /// Host string
    Str(SmolStr),
    /// Host n-dimensional array
    Array(HostNdArray),
    /// Opaque host object
    Object(HostObject),
}

impl HostValue {
    /// Host type name of this value.
    pub fn type_name(&self) -> &str {
        match self {
            HostValue::None => "none",
            HostValue::Bool(_) => "bool",
            HostValue::Int(_) => "int",
            HostValue::Float(_) => "float",
            HostValue::Str(_) => "str",
            HostValue::Array(_) => "ndarray",
            HostValue::Object(obj) => obj.type_name(),
        }
    }

    /// Whether this value is an array.
    pub fn is_array(&self) -> bool {
        matches!(self, HostValue::Array(_))
    }

    /// Try to borrow as an array.
    pub fn as_array(&self) -> Option<&HostNdArray> {
        match self {
            HostValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Try to borrow as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            HostValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::None => write!(f, "none"),
            HostValue::Bool(b) => write!(f, "{}", b),
            HostValue::Int(n) => write!(f, "{}", n),
            HostValue::Float(x) => write!(f, "{}", x),
            HostValue::Str(s) => write!(f, "'{}'", s),
            HostValue::Array(arr) => write!(f, "{}", arr),
            HostValue::Object(obj) => write!(f, "<{} object>", obj.type_name()),
        }
    }
}

/// Opaque handle to a host object with named attributes.
#[derive(Debug, Clone)]
pub struct HostObject {
    id: u64,
    type_name: SmolStr,
    attributes: Rc<RefCell<IndexMap<SmolStr, HostValue>>>,
}

impl HostObject {
    /// Create a new host object of the given type.
    pub fn new(type_name: impl Into<SmolStr>) -> Self {
        static NEXT_ID: AtomicU64 = AtomicU64::new(1);
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            type_name: type_name.into(),
            attributes: Rc::new(RefCell::new(IndexMap::new())),
        }
    }

    /// Host type name of this object.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Object identity.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Set a named attribute.
    pub fn set_attr(&self, name: impl Into<SmolStr>, value: HostValue) {
        self.attributes.borrow_mut().insert(name.into(), value);
    }

    /// Get a named attribute.
    pub fn get_attr(&self, name: &str) -> Option<HostValue> {
        self.attributes.borrow().get(name).cloned()
    }

    /// Whether the object carries a named attribute.
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.borrow().contains_key(name)
    }
}

impl PartialEq for HostObject {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(HostValue::None.type_name(), "none");
        assert_eq!(HostValue::Int(3).type_name(), "int");
        assert_eq!(HostValue::Str("x".into()).type_name(), "str");
        assert_eq!(
            HostValue::Object(HostObject::new("thing")).type_name(),
            "thing"
        );
    }

    #[test]
    fn test_array_accessor() {
        assert!(HostValue::Int(1).as_array().is_none());
        assert!(!HostValue::Float(0.5).is_array());
    }

    #[test]
    fn test_object_attributes() {
        let obj = HostObject::new("record");
        assert!(!obj.has_attr("message"));

        obj.set_attr("message", HostValue::Str("hello".into()));
        assert!(obj.has_attr("message"));
        assert_eq!(
            obj.get_attr("message").and_then(|v| v.as_str().map(String::from)),
            Some("hello".to_string())
        );
    }

    #[test]
    fn test_object_identity() {
        let a = HostObject::new("record");
        let b = HostObject::new("record");
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }
}
