//! Acquire/release of the three JNI reference flavors.
//!
//! Global references pin an object against garbage collection until
//! explicitly released; local references live until the current native frame
//! returns (or are released early); weak references do not pin and must be
//! upgraded before use.

use std::sync::Arc;

use log::warn;

use crate::env::Env;
use crate::errors::{Error, Result};
use crate::proxy::Object;
use crate::sys;
use crate::vm;

/// Creates a new global reference to `obj`. The input reference is not
/// consumed.
pub fn new_global_ref(env: &Env, obj: sys::jobject) -> Result<sys::jobject> {
    let new_ref = jni_method!(env.as_raw(), NewGlobalRef);
    let global = unsafe { new_ref(env.as_raw(), obj) };
    if global.is_null() {
        return Err(Error::jni(
            "unable to create a new global reference; the virtual machine \
             may have exhausted its heap",
        ));
    }
    Ok(global)
}

/// Releases a global reference. Safe to call with a pending exception.
pub fn delete_global_ref(env: &Env, global: sys::jobject) -> Result<()> {
    let delete = jni_method!(env.as_raw(), DeleteGlobalRef);
    unsafe { delete(env.as_raw(), global) };
    Ok(())
}

/// Creates a new local reference to `obj`.
pub fn new_local_ref(env: &Env, obj: sys::jobject) -> Result<sys::jobject> {
    let new_ref = jni_method!(env.as_raw(), NewLocalRef);
    let local = unsafe { new_ref(env.as_raw(), obj) };
    if local.is_null() {
        return Err(Error::jni(
            "unable to create a new local reference; the local reference \
             table may be full (see EnsureLocalCapacity)",
        ));
    }
    Ok(local)
}

/// Releases a local reference before its frame returns.
pub fn delete_local_ref(env: &Env, local: sys::jobject) -> Result<()> {
    let delete = jni_method!(env.as_raw(), DeleteLocalRef);
    unsafe { delete(env.as_raw(), local) };
    Ok(())
}

/// Creates a weak global reference to `obj`.
pub fn new_weak_global_ref(env: &Env, obj: sys::jobject) -> Result<sys::jweak> {
    let new_ref = jni_method!(env.as_raw(), NewWeakGlobalRef);
    let weak = unsafe { new_ref(env.as_raw(), obj) };
    if weak.is_null() {
        return Err(Error::jni("unable to create a new weak global reference"));
    }
    Ok(weak)
}

/// Releases a weak global reference.
pub fn delete_weak_global_ref(env: &Env, weak: sys::jweak) -> Result<()> {
    let delete = jni_method!(env.as_raw(), DeleteWeakGlobalRef);
    unsafe { delete(env.as_raw(), weak) };
    Ok(())
}

/// A weak reference to a JVM object. Does not pin the referent; upgrade it
/// before use, and be prepared for the upgrade to fail if the referent was
/// collected.
///
/// Clones share one underlying weak reference, released when the last clone
/// drops.
#[derive(Clone)]
pub struct WeakRef {
    guard: Arc<WeakGuard>,
}

struct WeakGuard {
    raw: sys::jweak,
}

// JNI weak global references are usable from any attached thread.
unsafe impl Send for WeakGuard {}
unsafe impl Sync for WeakGuard {}

impl WeakRef {
    /// Downgrades `object` to a weak reference. Fails on a null object.
    pub fn new(env: &Env, object: &Object) -> Result<Self> {
        let raw = non_null!(object.as_raw(), "WeakRef::new object argument");
        let weak = new_weak_global_ref(env, raw)?;
        Ok(WeakRef {
            guard: Arc::new(WeakGuard { raw: weak }),
        })
    }

    /// Attempts to upgrade back to a strong [`Object`]. Returns `Ok(None)`
    /// if the referent has been garbage-collected.
    pub fn upgrade(&self, env: &Env) -> Result<Option<Object>> {
        // NewLocalRef on a dead weak reference yields null, which is the
        // collected case rather than an error.
        let new_ref = jni_method!(env.as_raw(), NewLocalRef);
        let local = unsafe { new_ref(env.as_raw(), self.guard.raw) };
        if local.is_null() {
            return Ok(None);
        }
        let object = Object::from_owned_local(env, local)?;
        Ok(Some(object))
    }
}

impl Drop for WeakGuard {
    fn drop(&mut self) {
        match vm::attach() {
            Ok(env) => {
                if let Err(e) = delete_weak_global_ref(&env, self.raw) {
                    warn!("error dropping weak reference: {e}");
                }
            }
            // VM already torn down; the reference died with it.
            Err(Error::VmShutdown) => {}
            Err(e) => warn!("unable to attach to drop weak reference: {e}"),
        }
    }
}
