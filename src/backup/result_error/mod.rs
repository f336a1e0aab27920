//! Crate error type plus the context traits used to wrap failures
//! with what was being read, parsed or run when they happened.

use std::fmt::Debug;
pub mod error;
pub mod result;

/// Wraps an error with the debug view of the object being processed
/// and the function that failed on it.
pub trait WithDebugObjectAndFnName<S: Into<String>, O: Debug + 'static> {
    fn with_debug_object_and_fn_name(self, obj: O, fn_name: S) -> Self;
}

/// Wraps an error with a human readable message.
pub trait WithMsg<S: Into<String>> {
    fn with_msg(self, msg: S) -> Self;
}
