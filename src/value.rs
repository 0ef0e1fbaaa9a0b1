//! The typed value model shared by proxies, resolvers and the registry.
//!
//! [`JavaValue`] ties a native value to its Java type identity and raw
//! `jvalue` representation. The three kind traits ([`CallReturn`],
//! [`FieldValue`], [`ArrayElement`]) supply the per-kind JNI primitives —
//! `CallIntMethodA` vs `CallObjectMethodA` and so on — so that resolvers and
//! array/field proxies can be written once, generically, instead of once per
//! specialized type.

use std::marker::PhantomData;

use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::Result;
use crate::sys;

/// A native value with a Java type identity.
pub trait JavaValue: Sized {
    /// The descriptor of this value's static Java type.
    fn java_class() -> &'static ClassDesc;

    /// Wraps a raw `jvalue` produced by a JNI primitive.
    ///
    /// Takes ownership of the value: if it carries a local reference, the
    /// implementation promotes it (typically to a global reference) and
    /// deletes the local.
    ///
    /// # Safety
    ///
    /// The `jvalue` union field read must match this type's kind, and any
    /// reference in it must be a valid local reference (or null).
    unsafe fn from_raw(env: &Env, value: sys::jvalue) -> Result<Self>;

    /// The raw `jvalue` representation, for use as a call argument or a
    /// field/element write.
    fn as_raw(&self) -> sys::jvalue;
}

/// A type usable as a method return value: supplies the kind-matched
/// `Call…MethodA` primitives.
pub trait CallReturn: JavaValue {
    /// Invokes an instance method returning this kind. The result is raw;
    /// any object reference in it is a fresh local reference.
    ///
    /// # Safety
    ///
    /// `obj` must be a valid reference, `id` a method ID resolved on its
    /// class with a signature returning this kind, and `args` a pointer to
    /// at least as many `jvalue`s as the method takes.
    unsafe fn call_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue>;

    /// Static counterpart of [`call_raw`](CallReturn::call_raw).
    ///
    /// # Safety
    ///
    /// Same contract, with `class` the declaring class.
    unsafe fn call_static_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue>;
}

/// A type usable as a field value: supplies the kind-matched
/// `Get…Field`/`Set…Field` primitives and their static variants.
pub trait FieldValue: JavaValue {
    /// # Safety
    /// `obj` valid, `id` a field ID of this kind on its class.
    unsafe fn get_field_raw(env: &Env, obj: sys::jobject, id: sys::jfieldID)
        -> Result<sys::jvalue>;

    /// # Safety
    /// Same contract as [`get_field_raw`](FieldValue::get_field_raw).
    unsafe fn set_field_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jfieldID,
        value: sys::jvalue,
    ) -> Result<()>;

    /// # Safety
    /// `class` valid, `id` a static field ID of this kind on it.
    unsafe fn get_static_field_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jfieldID,
    ) -> Result<sys::jvalue>;

    /// # Safety
    /// Same contract as [`get_static_field_raw`](FieldValue::get_static_field_raw).
    unsafe fn set_static_field_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jfieldID,
        value: sys::jvalue,
    ) -> Result<()>;
}

/// A type usable as an array element: supplies the kind-matched element
/// get/set and array construction primitives.
pub trait ArrayElement: JavaValue {
    /// Reads one element. An index out of bounds leaves a Java exception
    /// pending, which the caller translates.
    ///
    /// # Safety
    /// `array` must be an array of this kind.
    unsafe fn get_element_raw(env: &Env, array: sys::jarray, index: sys::jsize)
        -> Result<sys::jvalue>;

    /// Writes one element.
    ///
    /// # Safety
    /// Same contract as [`get_element_raw`](ArrayElement::get_element_raw).
    unsafe fn set_element_raw(
        env: &Env,
        array: sys::jarray,
        index: sys::jsize,
        value: sys::jvalue,
    ) -> Result<()>;

    /// Allocates a new array of this kind; the result is a local reference.
    ///
    /// # Safety
    /// `len` must be non-negative.
    unsafe fn new_array_raw(env: &Env, len: sys::jsize) -> Result<sys::jarray>;
}

/// An ordered argument list for one invocation.
///
/// Carries the raw `jvalue` for each argument together with its class
/// descriptor, from which the resolver composes the method signature. The
/// lifetime ties the list to the argument values it borrows, so object
/// references stay alive across the call.
pub struct Args<'a> {
    values: Vec<sys::jvalue>,
    classes: Vec<&'static ClassDesc>,
    _borrow: PhantomData<&'a ()>,
}

impl<'a> Args<'a> {
    /// An empty argument list.
    pub fn new() -> Self {
        Args {
            values: Vec::new(),
            classes: Vec::new(),
            _borrow: PhantomData,
        }
    }

    /// Appends an argument. Builder-style so call sites read in declaration
    /// order: `Args::new().arg(&a).arg(&b)`.
    pub fn arg<T: JavaValue>(mut self, value: &'a T) -> Self {
        self.values.push(value.as_raw());
        self.classes.push(T::java_class());
        self
    }

    /// Number of arguments.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True if no arguments were added.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The argument class descriptors, for signature composition.
    pub(crate) fn classes(&self) -> &[&'static ClassDesc] {
        &self.classes
    }

    /// Pointer suitable for the `…A` call primitives. Never read by the JVM
    /// when the resolved method takes no arguments.
    pub(crate) fn as_ptr(&self) -> *const sys::jvalue {
        self.values.as_ptr()
    }
}

impl<'a> Default for Args<'a> {
    fn default() -> Self {
        Args::new()
    }
}

/// Builds an [`Args`] list from borrowed argument values:
/// `args![&name, &count]`.
#[macro_export]
macro_rules! args {
    () => { $crate::value::Args::new() };
    ($($arg:expr),+ $(,)?) => {
        $crate::value::Args::new()$(.arg($arg))+
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{JInt, JLong};

    #[test]
    fn collects_values_and_classes_in_order() {
        let a = JInt(7);
        let b = JLong(-1);
        let args = Args::new().arg(&a).arg(&b);
        assert_eq!(args.len(), 2);
        assert!(!args.is_empty());
        assert_eq!(args.classes()[0].type_sig(), "I");
        assert_eq!(args.classes()[1].type_sig(), "J");
        unsafe {
            assert_eq!(args.values[0].i, 7);
            assert_eq!(args.values[1].j, -1);
        }
    }

    #[test]
    fn empty_list_has_no_classes() {
        let args = Args::new();
        assert!(args.is_empty());
        assert!(args.classes().is_empty());
    }
}
