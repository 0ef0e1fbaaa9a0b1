//! Constructor invocation.

use std::marker::PhantomData;

use once_cell::sync::OnceCell;

use crate::bridge;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::invoke::{method, MethodId};
use crate::sys;
use crate::types::JVoid;
use crate::value::{Args, JavaValue};

/// One constructor overload of the proxy type `T`.
///
/// Resolved as the `<init>` member with a `void` return; the ID is cached
/// after the first instantiation.
pub struct Constructor<T: JavaValue> {
    id: OnceCell<MethodId>,
    _ty: PhantomData<T>,
}

impl<T: JavaValue> Constructor<T> {
    /// Creates an unresolved constructor for `T`.
    pub const fn new() -> Self {
        Constructor {
            id: OnceCell::new(),
            _ty: PhantomData,
        }
    }

    /// Instantiates a new `T`. An exception thrown by the constructor comes
    /// back as a translated [`Error::Java`].
    pub fn new_instance(&self, env: &Env, args: &Args) -> Result<T> {
        let class = T::java_class().get(env)?;
        let id = self
            .id
            .get_or_try_init(|| {
                method::resolve(env, T::java_class(), "<init>", args, JVoid::java_class(), false)
            })
            .copied()?;
        let new_object = jni_method!(env.as_raw(), NewObjectA);
        let local = unsafe { new_object(env.as_raw(), class, id.raw, args.as_ptr()) };
        if local.is_null() {
            let message = format!(
                "unable to construct an instance of {}",
                T::java_class().binary_name()
            );
            return Err(match bridge::check_and_raise(env) {
                Err(cause) => Error::jni_with(message, cause),
                Ok(()) => Error::jni(message),
            });
        }
        bridge::check_and_raise(env)?;
        unsafe { T::from_raw(env, sys::jvalue { l: local }) }
    }
}

impl<T: JavaValue> Default for Constructor<T> {
    fn default() -> Self {
        Constructor::new()
    }
}
