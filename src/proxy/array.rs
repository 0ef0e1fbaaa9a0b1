//! Array proxies and per-element handles.

use std::marker::PhantomData;

use crate::bridge;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::proxy::Object;
use crate::sys;
use crate::value::{ArrayElement, JavaValue};

/// A typed proxy for a Java array of `T`.
///
/// Like every proxy it pins the array with a global reference; element reads
/// and writes go through JNI on each access, so a Java-side index check
/// surfaces here as a translated `ArrayIndexOutOfBoundsException`.
#[derive(Clone)]
pub struct JArray<T: ArrayElement> {
    object: Object,
    _elem: PhantomData<T>,
}

impl<T: ArrayElement> JArray<T> {
    /// Allocates a new array of `len` elements, zero/null initialized.
    pub fn new(env: &Env, len: usize) -> Result<Self> {
        let len = to_jsize(len)?;
        let raw = unsafe { T::new_array_raw(env, len)? };
        bridge::check_and_raise(env)?;
        let object = Object::from_owned_local(env, raw)?;
        Ok(JArray {
            object,
            _elem: PhantomData,
        })
    }

    /// Wraps an untyped object known to be an array of `T`.
    pub fn from_object(object: Object) -> Self {
        JArray {
            object,
            _elem: PhantomData,
        }
    }

    /// The untyped view.
    pub fn as_object(&self) -> &Object {
        &self.object
    }

    /// Number of elements.
    pub fn len(&self, env: &Env) -> Result<usize> {
        let raw = non_null!(self.object.as_raw(), "JArray::len receiver");
        let get_length = jni_method!(env.as_raw(), GetArrayLength);
        let len = unsafe { get_length(env.as_raw(), raw) };
        Ok(len as usize)
    }

    /// True if the array has no elements.
    pub fn is_empty(&self, env: &Env) -> Result<bool> {
        Ok(self.len(env)? == 0)
    }

    /// Reads the element at `index`.
    pub fn get(&self, env: &Env, index: usize) -> Result<T> {
        let raw = non_null!(self.object.as_raw(), "JArray::get receiver");
        let value = unsafe { T::get_element_raw(env, raw, to_jsize(index)?)? };
        bridge::check_and_raise(env)?;
        unsafe { T::from_raw(env, value) }
    }

    /// Writes `value` at `index`.
    pub fn set(&self, env: &Env, index: usize, value: &T) -> Result<()> {
        let raw = non_null!(self.object.as_raw(), "JArray::set receiver");
        unsafe { T::set_element_raw(env, raw, to_jsize(index)?, value.as_raw())? };
        bridge::check_and_raise(env)
    }

    /// A handle bound to one element, for repeated access to the same slot.
    pub fn at(&self, index: usize) -> ElementProxy<'_, T> {
        ElementProxy { array: self, index }
    }
}

/// A handle to one array slot. Reads always reflect the current element
/// value; writes go straight through to the array.
pub struct ElementProxy<'a, T: ArrayElement> {
    array: &'a JArray<T>,
    index: usize,
}

impl<'a, T: ArrayElement> ElementProxy<'a, T> {
    /// The bound index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Reads the element.
    pub fn get(&self, env: &Env) -> Result<T> {
        self.array.get(env, self.index)
    }

    /// Writes the element.
    pub fn set(&self, env: &Env, value: &T) -> Result<()> {
        self.array.set(env, self.index, value)
    }
}

fn to_jsize(index: usize) -> Result<sys::jsize> {
    sys::jsize::try_from(index)
        .map_err(|_| Error::jni(format!("array index {index} exceeds the jsize range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::JInt;
    use assert_matches::assert_matches;

    #[test]
    fn rejects_oversized_index() {
        assert_matches!(to_jsize(usize::MAX), Err(Error::Jni { .. }));
        assert_eq!(to_jsize(7).unwrap(), 7);
    }

    #[test]
    fn element_proxy_remembers_its_slot() {
        let array: JArray<JInt> = JArray::from_object(Object::null());
        assert_eq!(array.at(3).index(), 3);
    }
}
