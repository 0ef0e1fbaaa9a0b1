//! Exception translation at the native/JVM boundary.
//!
//! Every JNI operation that can throw is followed by
//! [`check_and_raise`]: it clears the pending exception, walks the thrown
//! object's class hierarchy until it finds a class with a registered
//! factory, and surfaces the factory's proxy as [`Error::Java`]. A throwable
//! whose entire hierarchy is unregistered is captured generically, keeping
//! its runtime class name and message.
//!
//! The reverse direction, raising a native error back into the JVM, lives on
//! [`Env::throw`](crate::env::Env::throw).

use log::trace;
use once_cell::sync::OnceCell;

use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::{Error, JavaError, Result};
use crate::invoke::MethodId;
use crate::proxy::Object;
use crate::refs;
use crate::registry;
use crate::strings::{self, JniString};
use crate::sys;
use crate::throwables::UnknownThrowable;

/// Checks for a pending Java exception and, if one exists, clears it and
/// returns it translated as [`Error::Java`].
///
/// Call this after any JNI primitive that can throw; no other JNI call is
/// legal on the thread while the exception is still pending.
pub fn check_and_raise(env: &Env) -> Result<()> {
    if !env.exception_check()? {
        return Ok(());
    }
    let throwable = env.exception_occurred()?;
    env.exception_clear()?;
    if throwable.is_null() {
        return Err(Error::jni(
            "an exception was pending but ExceptionOccurred returned null",
        ));
    }
    let object = Object::from_owned_local(env, throwable)?;
    Err(match translate(env, &object) {
        Ok(java) => Error::Java(java),
        Err(cause) => Error::jni_with("unable to translate a thrown exception", cause),
    })
}

/// Walks the throwable's class hierarchy, most-derived first, and hands the
/// object to the first registered factory. Falls back to a generic capture
/// when no class in the hierarchy is registered.
fn translate(env: &Env, object: &Object) -> Result<JavaError> {
    let mut class = env.get_object_class(object.as_raw())?;
    loop {
        let name = call_get_name(env, class)?;
        if let Some(factory) = registry::lookup(&name) {
            trace!("translating a thrown {name}");
            refs::delete_local_ref(env, class)?;
            return factory(env, object.clone());
        }
        let parent = env.get_superclass(class)?;
        refs::delete_local_ref(env, class)?;
        if parent.is_null() {
            break;
        }
        class = parent;
    }
    trace!("no factory registered for a thrown exception; capturing generically");
    Ok(JavaError::new(UnknownThrowable::capture(env, object.clone())?))
}

/// Binary name of the runtime class of `obj`.
pub(crate) fn class_name_of(env: &Env, obj: sys::jobject) -> Result<String> {
    let class = env.get_object_class(obj)?;
    let name = call_get_name(env, class);
    refs::delete_local_ref(env, class)?;
    name
}

/// Result of `Throwable.getMessage()` on `obj`, or `None` for a message-less
/// throwable.
pub(crate) fn throwable_message(env: &Env, obj: sys::jobject) -> Result<Option<String>> {
    static GET_MESSAGE: OnceCell<MethodId> = OnceCell::new();
    static THROWABLE_CLASS: ClassDesc =
        ClassDesc::new("java/lang/Throwable", "Ljava/lang/Throwable;");
    let id = GET_MESSAGE
        .get_or_try_init(|| {
            resolve_cached(
                env,
                &THROWABLE_CLASS,
                "getMessage",
                "()Ljava/lang/String;",
            )
        })
        .copied()?;
    let call = jni_method!(env.as_raw(), CallObjectMethodA);
    let message = unsafe { call(env.as_raw(), obj, id.raw, std::ptr::null()) };
    clear_nested(env, "Throwable.getMessage")?;
    if message.is_null() {
        return Ok(None);
    }
    let text = strings::get_string(env, message)?;
    refs::delete_local_ref(env, message)?;
    Ok(Some(text))
}

/// `Class.getName()` on a raw class reference. Used inside translation, so
/// it must not recurse into [`check_and_raise`] itself.
fn call_get_name(env: &Env, class: sys::jclass) -> Result<String> {
    static GET_NAME: OnceCell<MethodId> = OnceCell::new();
    static CLASS_CLASS: ClassDesc = ClassDesc::new("java/lang/Class", "Ljava/lang/Class;");
    let id = GET_NAME
        .get_or_try_init(|| resolve_cached(env, &CLASS_CLASS, "getName", "()Ljava/lang/String;"))
        .copied()?;
    let call = jni_method!(env.as_raw(), CallObjectMethodA);
    let name = unsafe { call(env.as_raw(), class, id.raw, std::ptr::null()) };
    clear_nested(env, "Class.getName")?;
    let name = non_null!(name, "Class.getName result");
    let text = strings::get_string(env, name)?;
    refs::delete_local_ref(env, name)?;
    Ok(text)
}

fn resolve_cached(
    env: &Env,
    class: &'static ClassDesc,
    name: &'static str,
    signature: &'static str,
) -> Result<MethodId> {
    // get_nested keeps the bootstrap lookups out of check_and_raise, so a
    // failing FindClass inside a translation cannot start another one.
    let raw_class = class.get_nested(env)?;
    let c_name = JniString::new(name);
    let c_sig = JniString::new(signature);
    let lookup = jni_method!(env.as_raw(), GetMethodID);
    let id = unsafe { lookup(env.as_raw(), raw_class, c_name.as_ptr(), c_sig.as_ptr()) };
    if id.is_null() {
        clear_nested(env, name)?;
        return Err(Error::jni(format!(
            "unable to find the method {}.{name} with signature {signature}",
            class.binary_name()
        )));
    }
    Ok(MethodId { raw: id })
}

/// Clears an exception raised by the translation machinery itself; nested
/// failures abandon translation rather than recurse.
fn clear_nested(env: &Env, context: &'static str) -> Result<()> {
    if env.exception_check()? {
        env.exception_clear()?;
        return Err(Error::jni(format!("{context} threw during translation")));
    }
    Ok(())
}
