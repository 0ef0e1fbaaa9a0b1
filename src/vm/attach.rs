//! Per-thread attachment.
//!
//! [`attach`] is idempotent: a thread already attached (by us or by the JVM
//! itself) gets its existing `JNIEnv` back via the `GetEnv` fast path.
//! Otherwise the thread is attached and a guard is parked in thread-local
//! storage, so the thread detaches itself when it exits. [`detach`] drops
//! the guard early.

use std::cell::RefCell;
use std::fmt;
use std::os::raw::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};

use crate::env::Env;
use crate::errors::{Error, Result};
use crate::proxy::Object;
use crate::strings::JniString;
use crate::sys;
use crate::vm::state;

/// Number of threads currently attached through this module. Threads
/// attached externally (e.g. Java threads calling into native code) are not
/// counted; they were never ours to detach.
static ATTACHED_THREADS: AtomicUsize = AtomicUsize::new(0);

thread_local! {
    static ATTACH_GUARD: RefCell<Option<AttachGuard>> = const { RefCell::new(None) };
}

/// How a thread presents itself to the JVM when it attaches.
#[derive(Clone, Default)]
pub struct AttachConfig {
    name: Option<String>,
    group: Option<Object>,
    daemon: bool,
}

impl AttachConfig {
    /// Defaults: unnamed, default thread group, non-daemon.
    pub fn new() -> Self {
        AttachConfig::default()
    }

    /// Java-side thread name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// `java.lang.ThreadGroup` to place the attached thread in. The config
    /// pins the group object until the attach call is made.
    pub fn group(mut self, group: Object) -> Self {
        self.group = Some(group);
        self
    }

    /// Attach as a daemon thread, which does not block VM destruction.
    pub fn daemon(mut self, daemon: bool) -> Self {
        self.daemon = daemon;
        self
    }
}

impl fmt::Debug for AttachConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachConfig")
            .field("name", &self.name)
            .field("group", &self.group.as_ref().map(|g| g.as_raw()))
            .field("daemon", &self.daemon)
            .finish()
    }
}

/// Attaches the current thread with default settings, or returns the
/// existing environment if it is already attached.
pub fn attach() -> Result<Env> {
    attach_with(&AttachConfig::new())
}

/// Attaches the current thread, or returns the existing environment if it
/// is already attached (in which case `config` is ignored).
pub fn attach_with(config: &AttachConfig) -> Result<Env> {
    let vm = state::current_vm()?;
    if let Some(env) = existing_env(vm)? {
        return Ok(env);
    }
    attach_current_thread(vm, config)
}

/// Detaches the current thread if this module attached it. A no-op for
/// unattached and externally attached threads.
pub fn detach() {
    ATTACH_GUARD.with(|guard| {
        *guard.borrow_mut() = None;
    });
}

/// Number of threads currently attached through [`attach`].
pub fn threads_attached() -> usize {
    ATTACHED_THREADS.load(Ordering::SeqCst)
}

fn existing_env(vm: *mut sys::JavaVM) -> Result<Option<Env>> {
    let get_env = java_vm_method!(vm, GetEnv);
    let mut ptr: *mut c_void = std::ptr::null_mut();
    let rc = unsafe { get_env(vm, &mut ptr, sys::JNI_VERSION_1_6) };
    match rc {
        sys::JNI_OK => Ok(Some(unsafe { Env::from_raw(ptr as *mut sys::JNIEnv)? })),
        sys::JNI_EDETACHED => Ok(None),
        _ => Err(Error::jni(format!("GetEnv returned an error code of {rc}"))),
    }
}

fn attach_current_thread(vm: *mut sys::JavaVM, config: &AttachConfig) -> Result<Env> {
    // Default to the Rust thread's name so both sides of a stack trace line
    // up; an unnamed thread lets the JVM pick.
    let current = std::thread::current();
    let name = config
        .name
        .as_deref()
        .or_else(|| current.name())
        .map(JniString::new);
    let mut args = sys::JavaVMAttachArgs {
        version: sys::JNI_VERSION_1_6,
        name: name
            .as_ref()
            .map(|n| n.as_ptr() as *mut _)
            .unwrap_or(std::ptr::null_mut()),
        group: config
            .group
            .as_ref()
            .map(|g| g.as_raw())
            .unwrap_or(std::ptr::null_mut()),
    };

    let mut ptr: *mut c_void = std::ptr::null_mut();
    let rc = if config.daemon {
        let attach = java_vm_method!(vm, AttachCurrentThreadAsDaemon);
        unsafe { attach(vm, &mut ptr, &mut args as *mut _ as *mut c_void) }
    } else {
        let attach = java_vm_method!(vm, AttachCurrentThread);
        unsafe { attach(vm, &mut ptr, &mut args as *mut _ as *mut c_void) }
    };
    if rc != sys::JNI_OK {
        return Err(Error::jni(format!(
            "AttachCurrentThread returned an error code of {rc}"
        )));
    }
    let env = unsafe { Env::from_raw(ptr as *mut sys::JNIEnv)? };

    ATTACH_GUARD.with(|guard| {
        *guard.borrow_mut() = Some(AttachGuard { vm });
    });
    let attached = ATTACHED_THREADS.fetch_add(1, Ordering::SeqCst) + 1;
    debug!(
        "attached thread {:?}; {attached} threads now attached",
        std::thread::current().id()
    );
    Ok(env)
}

/// Detaches the thread when it exits (or on [`detach`]).
struct AttachGuard {
    vm: *mut sys::JavaVM,
}

impl AttachGuard {
    fn detach_now(&self) -> Result<()> {
        // After shutdown the JVM has already detached (or invalidated) every
        // thread; calling in would touch a dead VM.
        if !state::is_running() {
            return Ok(());
        }
        let detach = java_vm_method!(self.vm, DetachCurrentThread);
        let rc = unsafe { detach(self.vm) };
        if rc != sys::JNI_OK {
            return Err(Error::jni(format!(
                "DetachCurrentThread returned an error code of {rc}"
            )));
        }
        Ok(())
    }
}

impl Drop for AttachGuard {
    fn drop(&mut self) {
        if let Err(e) = self.detach_now() {
            warn!("error detaching thread {:?}: {e}", std::thread::current().id());
        }
        let attached = ATTACHED_THREADS.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!(
            "detached thread {:?}; {attached} threads now attached",
            std::thread::current().id()
        );
    }
}
