//! Member resolution and invocation.
//!
//! A [`Method`], [`StaticMethod`], [`Constructor`] or [`Field`] names one
//! member overload of one class. The JNI member ID is resolved on first use
//! and cached for the life of the value; generated proxies keep one of these
//! in a `static` per member, so resolution happens once per process.

mod constructor;
mod field;
mod method;

pub use constructor::Constructor;
pub use field::{Field, StaticField};
pub use method::{Method, StaticMethod};

use crate::sys;

/// A resolved method ID. Valid as long as the declaring class is pinned,
/// which the class descriptor's global reference guarantees.
#[derive(Clone, Copy)]
pub(crate) struct MethodId {
    pub(crate) raw: sys::jmethodID,
}

unsafe impl Send for MethodId {}
unsafe impl Sync for MethodId {}

/// A resolved field ID, pinned the same way as [`MethodId`].
#[derive(Clone, Copy)]
pub(crate) struct FieldId {
    pub(crate) raw: sys::jfieldID,
}

unsafe impl Send for FieldId {}
unsafe impl Sync for FieldId {}
