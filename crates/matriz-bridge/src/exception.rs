//! Cross-Runtime Exception Bridge
//!
//! A native error crossing the boundary must surface as an idiomatic host
//! exception, not an unrelated generic failure. The bridge installs the
//! host exception type once at initialization; afterwards any
//! [`BridgeError`] can be materialized as a host exception object whose
//! `message` attribute carries the error's display string verbatim.
//!
//! Translating before the type is registered is a programming error and
//! panics; it is not recoverable at the call site.

use std::sync::OnceLock;

use smol_str::SmolStr;
use tracing::debug;

use crate::error::{BridgeError, BridgeResult};
use crate::host::{HostObject, HostValue};

/// Host type name of the bridged exception.
pub const EXCEPTION_TYPE_NAME: &str = "BridgeException";

/// Attribute under which the message is retrievable on the host object.
pub const MESSAGE_ATTR: &str = "message";

static EXCEPTION_TYPE: OnceLock<SmolStr> = OnceLock::new();

/// Install the host exception type. Call once during initialization,
/// before any native error may cross the boundary; later calls are no-ops.
pub fn register_exception() {
    if EXCEPTION_TYPE.set(SmolStr::new(EXCEPTION_TYPE_NAME)).is_ok() {
        debug!("registered host exception type {}", EXCEPTION_TYPE_NAME);
    }
}

/// Whether the host exception type has been installed.
pub fn is_exception_registered() -> bool {
    EXCEPTION_TYPE.get().is_some()
}

/// Materialize a native error as a host exception object.
///
/// # Panics
///
/// Panics if [`register_exception`] has not run.
pub fn to_host_exception(error: &BridgeError) -> HostObject {
    let type_name = EXCEPTION_TYPE
        .get()
        .expect("host exception type used before registration; call register_exception() first");

    let exception = HostObject::new(type_name.clone());
    exception.set_attr(MESSAGE_ATTR, HostValue::Str(SmolStr::new(error.to_string())));
    exception
}

/// Run a fallible boundary operation, translating any native error that
/// would otherwise escape into a host exception.
pub fn at_boundary<R>(f: impl FnOnce() -> BridgeResult<R>) -> Result<R, HostObject> {
    f().map_err(|err| to_host_exception(&err))
}
