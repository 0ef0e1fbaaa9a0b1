//! Dynamic loading of the JVM shared library.
//!
//! Creating a VM in-process needs `JNI_CreateJavaVM`, which lives in the
//! JVM's own shared library. Linking against it at build time would pin the
//! binary to one Java installation; instead the library is located (via the
//! `JAVA_HOME`-aware search in `java-locator`) and loaded at runtime.

use std::os::raw::c_void;
use std::path::Path;

use cfg_if::cfg_if;
use libloading::{Library, Symbol};
use log::info;

use crate::errors::{Error, Result};
use crate::sys;

type CreateVmFn = unsafe extern "system" fn(
    pvm: *mut *mut sys::JavaVM,
    penv: *mut *mut c_void,
    args: *mut c_void,
) -> sys::jint;

/// A handle to the loaded JVM library.
pub struct DynamicVmLoader {
    library: Library,
}

impl DynamicVmLoader {
    /// Locates the JVM library through `JAVA_HOME` or the platform search
    /// paths and loads it.
    pub fn locate() -> Result<Self> {
        let dir = java_locator::locate_jvm_dyn_library().map_err(|e| {
            Error::jni(format!("unable to locate the JVM dynamic library: {e}"))
        })?;
        Self::from_directory(dir)
    }

    /// Loads the JVM library from a directory containing it.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self> {
        Self::from_path(dir.as_ref().join(platform_library_name()))
    }

    /// Loads the JVM library from an explicit path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|e| {
            Error::jni(format!(
                "unable to load the JVM library from {}: {e}",
                path.display()
            ))
        })?;
        info!("loaded the JVM library from {}", path.display());
        Ok(DynamicVmLoader { library })
    }

    /// Invokes `JNI_CreateJavaVM`.
    pub(crate) fn create_java_vm(&self, args: &mut sys::JavaVMInitArgs) -> Result<*mut sys::JavaVM> {
        let create: Symbol<'_, CreateVmFn> =
            unsafe { self.library.get(b"JNI_CreateJavaVM\0") }.map_err(|e| {
                Error::jni(format!(
                    "the loaded JVM library does not export JNI_CreateJavaVM: {e}"
                ))
            })?;
        let mut vm: *mut sys::JavaVM = std::ptr::null_mut();
        let mut env: *mut c_void = std::ptr::null_mut();
        let rc = unsafe { create(&mut vm, &mut env, args as *mut _ as *mut c_void) };
        if rc != sys::JNI_OK {
            return Err(Error::jni(format!(
                "JNI_CreateJavaVM returned an error code of {rc}"
            )));
        }
        Ok(non_null!(vm, "JNI_CreateJavaVM vm result"))
    }
}

fn platform_library_name() -> &'static str {
    cfg_if! {
        if #[cfg(target_os = "windows")] {
            "jvm.dll"
        } else if #[cfg(any(target_os = "macos", target_os = "ios"))] {
            "libjvm.dylib"
        } else {
            "libjvm.so"
        }
    }
}
