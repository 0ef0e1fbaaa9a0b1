//! Instance and static method invocation.

use std::marker::PhantomData;

use once_cell::sync::OnceCell;

use crate::bridge;
use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::invoke::MethodId;
use crate::proxy::Object;
use crate::signature::TypeSignature;
use crate::strings::JniString;
use crate::value::{Args, CallReturn, JavaValue};

/// One instance method overload, returning `R`.
///
/// The method ID is resolved from the first call's argument classes and
/// cached; a value therefore stands for a single signature. Keep one
/// `Method` per overload.
pub struct Method<R: CallReturn> {
    class: &'static ClassDesc,
    name: &'static str,
    id: OnceCell<MethodId>,
    _ret: PhantomData<R>,
}

impl<R: CallReturn> Method<R> {
    /// Creates an unresolved method. `const` so generated code can keep one
    /// in a `static` per proxy method.
    pub const fn new(class: &'static ClassDesc, name: &'static str) -> Self {
        Method {
            class,
            name,
            id: OnceCell::new(),
            _ret: PhantomData,
        }
    }

    /// Invokes the method on `obj`. A Java exception thrown by the method
    /// comes back as a translated [`Error::Java`].
    pub fn call(&self, env: &Env, obj: &Object, args: &Args) -> Result<R> {
        let raw = non_null!(obj.as_raw(), "Method::call receiver");
        let id = self.id(env, args, false)?;
        // A thrown exception must be translated before any further JNI use;
        // on failure the returned local is null, so nothing leaks.
        let value = unsafe { R::call_raw(env, raw, id.raw, args.as_ptr())? };
        bridge::check_and_raise(env)?;
        unsafe { R::from_raw(env, value) }
    }

    fn id(&self, env: &Env, args: &Args, is_static: bool) -> Result<MethodId> {
        self.id
            .get_or_try_init(|| resolve(env, self.class, self.name, args, R::java_class(), is_static))
            .copied()
    }
}

/// One static method overload, returning `R`.
pub struct StaticMethod<R: CallReturn> {
    class: &'static ClassDesc,
    name: &'static str,
    id: OnceCell<MethodId>,
    _ret: PhantomData<R>,
}

impl<R: CallReturn> StaticMethod<R> {
    /// Creates an unresolved static method.
    pub const fn new(class: &'static ClassDesc, name: &'static str) -> Self {
        StaticMethod {
            class,
            name,
            id: OnceCell::new(),
            _ret: PhantomData,
        }
    }

    /// Invokes the method.
    pub fn call(&self, env: &Env, args: &Args) -> Result<R> {
        let class = self.class.get(env)?;
        let id = self
            .id
            .get_or_try_init(|| resolve(env, self.class, self.name, args, R::java_class(), true))
            .copied()?;
        let value = unsafe { R::call_static_raw(env, class, id.raw, args.as_ptr())? };
        bridge::check_and_raise(env)?;
        unsafe { R::from_raw(env, value) }
    }
}

/// Looks up a method ID, composing the JNI signature from the argument and
/// return class descriptors.
pub(crate) fn resolve(
    env: &Env,
    class: &'static ClassDesc,
    name: &'static str,
    args: &Args,
    ret: &'static ClassDesc,
    is_static: bool,
) -> Result<MethodId> {
    let signature = TypeSignature::for_member(args.classes(), ret)?.to_string();
    let raw_class = class.get(env)?;
    let c_name = JniString::new(name);
    let c_sig = JniString::new(&signature);
    let id = if is_static {
        let lookup = jni_method!(env.as_raw(), GetStaticMethodID);
        unsafe { lookup(env.as_raw(), raw_class, c_name.as_ptr(), c_sig.as_ptr()) }
    } else {
        let lookup = jni_method!(env.as_raw(), GetMethodID);
        unsafe { lookup(env.as_raw(), raw_class, c_name.as_ptr(), c_sig.as_ptr()) }
    };
    if id.is_null() {
        let message = format!(
            "unable to find the method {}.{} with signature {}",
            class.binary_name(),
            name,
            signature
        );
        return Err(match bridge::check_and_raise(env) {
            Err(cause) => Error::jni_with(message, cause),
            Ok(()) => Error::jni(message),
        });
    }
    Ok(MethodId { raw: id })
}
