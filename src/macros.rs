//! Macros for calling through the raw JNI function tables.
//!
//! Every entry in the `JNIEnv`/`JavaVM` interface tables is an
//! `Option<unsafe extern "system" fn ...>`; these macros null-check the
//! table and the slot before handing back the function pointer, so a
//! missing entry surfaces as an error instead of a wild call. The pointer
//! checks themselves are gated by the `null-checks` feature (on by
//! default); disabling it trades the checks for a little speed in release
//! builds that trust their inputs.

macro_rules! jni_method {
    ( $env:expr, $name:tt ) => {{
        let env: *mut $crate::sys::JNIEnv = $env;
        if cfg!(feature = "null-checks") && env.is_null() {
            return Err($crate::errors::Error::NullDeref("JNIEnv"));
        }
        #[allow(unused_unsafe)]
        match unsafe { (**env).$name } {
            Some(method) => method,
            None => {
                return Err($crate::errors::Error::JniEnvMethodNotFound(stringify!(
                    $name
                )))
            }
        }
    }};
}

macro_rules! java_vm_method {
    ( $vm:expr, $name:tt ) => {{
        let vm: *mut $crate::sys::JavaVM = $vm;
        if cfg!(feature = "null-checks") && vm.is_null() {
            return Err($crate::errors::Error::NullDeref("JavaVM"));
        }
        #[allow(unused_unsafe)]
        match unsafe { (**vm).$name } {
            Some(method) => method,
            None => {
                return Err($crate::errors::Error::JavaVmMethodNotFound(stringify!(
                    $name
                )))
            }
        }
    }};
}

macro_rules! non_null {
    ( $obj:expr, $ctx:expr ) => {
        if cfg!(feature = "null-checks") && $obj.is_null() {
            return Err($crate::errors::Error::NullPtr($ctx));
        } else {
            $obj
        }
    };
}
