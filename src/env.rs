//! Thin wrapper around a raw `JNIEnv` pointer.
//!
//! An [`Env`] is the per-thread execution context obtained from
//! [`crate::vm::attach`]. It is deliberately `Copy` and carries no lifetime
//! state of its own; it is only valid on the thread it was obtained on and
//! becomes invalid if that thread detaches.

use crate::errors::{Error, Result};
use crate::sys;

/// A per-thread JNI execution context.
///
/// Not `Send`: JNI environments are strictly thread-affine.
#[derive(Clone, Copy, Debug)]
pub struct Env {
    internal: *mut sys::JNIEnv,
}

impl Env {
    /// Wraps a raw `JNIEnv` pointer.
    ///
    /// # Safety
    ///
    /// The pointer must be a valid `JNIEnv` for the current thread. Only a
    /// null check is performed.
    pub unsafe fn from_raw(ptr: *mut sys::JNIEnv) -> Result<Self> {
        let ptr = non_null!(ptr, "Env::from_raw ptr argument");
        Ok(Env { internal: ptr })
    }

    /// The underlying `JNIEnv` pointer.
    pub fn as_raw(&self) -> *mut sys::JNIEnv {
        self.internal
    }

    /// Negotiated JNI interface version for this environment.
    pub fn version(&self) -> Result<sys::jint> {
        let get_version = jni_method!(self.as_raw(), GetVersion);
        Ok(unsafe { get_version(self.as_raw()) })
    }

    /// True if a Java exception is pending on this thread. This is the cheap
    /// check performed after every native invocation.
    pub fn exception_check(&self) -> Result<bool> {
        let check = jni_method!(self.as_raw(), ExceptionCheck);
        Ok(unsafe { check(self.as_raw()) } == sys::JNI_TRUE)
    }

    /// Returns the pending exception as a local reference, or null.
    pub(crate) fn exception_occurred(&self) -> Result<sys::jthrowable> {
        let occurred = jni_method!(self.as_raw(), ExceptionOccurred);
        Ok(unsafe { occurred(self.as_raw()) })
    }

    /// Clears the pending exception. Required before any further JNI call.
    pub(crate) fn exception_clear(&self) -> Result<()> {
        let clear = jni_method!(self.as_raw(), ExceptionClear);
        unsafe { clear(self.as_raw()) };
        Ok(())
    }

    /// Runtime class of an object, as a local reference.
    pub(crate) fn get_object_class(&self, obj: sys::jobject) -> Result<sys::jclass> {
        let get_class = jni_method!(self.as_raw(), GetObjectClass);
        let class = unsafe { get_class(self.as_raw(), obj) };
        Ok(non_null!(class, "GetObjectClass result"))
    }

    /// Superclass of a class, as a local reference; null for
    /// `java.lang.Object` and interfaces.
    pub(crate) fn get_superclass(&self, class: sys::jclass) -> Result<sys::jclass> {
        let get_superclass = jni_method!(self.as_raw(), GetSuperclass);
        Ok(unsafe { get_superclass(self.as_raw(), class) })
    }

    /// Raises `error` back into the JVM as a pending Java exception.
    ///
    /// A translated Java exception is rethrown as its original throwable; any
    /// other error becomes a `java.lang.RuntimeException` carrying the
    /// error's message. Used by native method implementations that must hand
    /// a failure back to a Java caller.
    pub fn throw(&self, error: &Error) -> Result<()> {
        if let Error::Java(java) = error {
            let raw = java.as_object().as_raw();
            if !raw.is_null() {
                let throw = jni_method!(self.as_raw(), Throw);
                let rc = unsafe { throw(self.as_raw(), raw) };
                if rc != sys::JNI_OK {
                    return Err(Error::jni(format!(
                        "Throw returned {rc} while rethrowing {}",
                        java.class_name()
                    )));
                }
                return Ok(());
            }
        }
        let class = crate::throwables::RuntimeException::java_class().get(self)?;
        let message = crate::strings::JniString::new(error.to_string());
        let throw_new = jni_method!(self.as_raw(), ThrowNew);
        let rc = unsafe { throw_new(self.as_raw(), class, message.as_ptr()) };
        if rc != sys::JNI_OK {
            return Err(Error::jni(format!("ThrowNew returned {rc}")));
        }
        Ok(())
    }
}
