//! Class descriptors: the (name, signature) identity of a Java type plus a
//! lazily resolved, cached class handle.

use once_cell::sync::OnceCell;

use crate::bridge;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::strings::JniString;
use crate::sys;

/// The identity of a Java type.
///
/// `name` is the JNI lookup name (`"java/lang/Object"`, or a full array
/// descriptor such as `"[Ljava/lang/String;"`); `type_sig` is the type
/// descriptor used inside member signatures (`"Ljava/lang/Object;"`, `"I"`).
///
/// The resolved class handle is cached for the lifetime of the descriptor —
/// typically the whole process, since generated proxies keep their
/// descriptor in a `static`. The first resolution creates a global reference
/// to the class, which also keeps its member IDs valid by preventing the
/// class from being unloaded.
pub struct ClassDesc {
    name: &'static str,
    type_sig: &'static str,
    handle: OnceCell<ClassHandle>,
}

struct ClassHandle {
    raw: sys::jclass,
}

// The cached handle is a global reference, valid on any attached thread.
unsafe impl Send for ClassHandle {}
unsafe impl Sync for ClassHandle {}

impl ClassDesc {
    /// Creates a descriptor. `const` so generated code can keep one in a
    /// `static` per proxy type.
    pub const fn new(name: &'static str, type_sig: &'static str) -> Self {
        ClassDesc {
            name,
            type_sig,
            handle: OnceCell::new(),
        }
    }

    /// JNI lookup name, e.g. `"java/lang/String"`.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type descriptor used in member signatures, e.g. `"Ljava/lang/String;"`.
    pub fn type_sig(&self) -> &'static str {
        self.type_sig
    }

    /// Binary (dot-separated) class name, the form Java reflection reports
    /// and the factory registry is keyed by.
    pub fn binary_name(&self) -> String {
        self.name.replace('/', ".")
    }

    /// Resolves the class handle, caching it on first success. Subsequent
    /// calls are lock-free reads of the cached value; a failed resolution is
    /// retried on the next call.
    pub fn get(&self, env: &Env) -> Result<sys::jclass> {
        self.resolve(env, true)
    }

    /// Resolution variant for the exception translation machinery itself: a
    /// failure clears the pending exception instead of translating it, so
    /// the translation walk cannot re-enter itself.
    pub(crate) fn get_nested(&self, env: &Env) -> Result<sys::jclass> {
        self.resolve(env, false)
    }

    fn resolve(&self, env: &Env, translate: bool) -> Result<sys::jclass> {
        let handle = self.handle.get_or_try_init(|| {
            let name = JniString::new(self.name);
            let find_class = jni_method!(env.as_raw(), FindClass);
            let local = unsafe { find_class(env.as_raw(), name.as_ptr()) };
            if local.is_null() {
                let message = format!("unable to find the class {}", self.binary_name());
                if !translate {
                    env.exception_clear()?;
                    return Err(Error::jni(message));
                }
                return Err(match bridge::check_and_raise(env) {
                    Err(cause) => Error::jni_with(message, cause),
                    Ok(()) => Error::jni(message),
                });
            }
            let global = crate::refs::new_global_ref(env, local)?;
            crate::refs::delete_local_ref(env, local)?;
            Ok(ClassHandle { raw: global })
        })?;
        Ok(handle.raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn binary_name_uses_dots() {
        static DESC: ClassDesc =
            ClassDesc::new("java/lang/RuntimeException", "Ljava/lang/RuntimeException;");
        assert_eq!(DESC.binary_name(), "java.lang.RuntimeException");
        assert_eq!(DESC.name(), "java/lang/RuntimeException");
        assert_eq!(DESC.type_sig(), "Ljava/lang/RuntimeException;");
    }

    #[test]
    fn array_descriptors_pass_through() {
        static DESC: ClassDesc = ClassDesc::new("[Ljava/lang/String;", "[Ljava/lang/String;");
        assert_eq!(DESC.binary_name(), "[Ljava.lang.String;");
    }
}
