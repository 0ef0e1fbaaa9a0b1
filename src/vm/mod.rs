//! Virtual machine lifecycle and thread attachment.
//!
//! A process holds at most one VM. It is installed either by creating one
//! in-process ([`create_vm`], behind the `invocation` feature) or by
//! adopting one that already exists ([`set_java_vm`], for libraries loaded
//! by a running JVM). Once installed, any thread can [`attach`] to obtain
//! its [`Env`](crate::env::Env).

mod attach;
#[cfg(feature = "invocation")]
mod loader;
mod options;
mod state;

pub use attach::{attach, attach_with, detach, threads_attached, AttachConfig};
#[cfg(feature = "invocation")]
pub use loader::DynamicVmLoader;
pub use options::{Verbose, VmOptions};
pub use state::is_running;

use log::{debug, info, warn};

use crate::class::ClassDesc;
use crate::errors::{Error, Result};
use crate::invoke::{Method, StaticMethod};
use crate::proxy::ObjectProxy;
use crate::sys;
use crate::types::JVoid;
use crate::value::Args;

/// Adopts an externally created VM, typically from `JNI_OnLoad`. Fails with
/// [`Error::VmAlreadyRunning`] if a VM is already installed.
pub fn set_java_vm(vm: *mut sys::JavaVM) -> Result<()> {
    let vm = non_null!(vm, "set_java_vm vm argument");
    state::install(vm)?;
    info!("adopted an externally created virtual machine");
    register_shutdown_hook();
    Ok(())
}

/// Creates a VM in-process, loading the JVM library found through the
/// platform search. The calling thread ends up attached as the main thread.
#[cfg(feature = "invocation")]
pub fn create_vm(options: &VmOptions) -> Result<()> {
    create_vm_with_loader(options, DynamicVmLoader::locate()?)
}

/// Creates a VM from an explicitly loaded JVM library.
#[cfg(feature = "invocation")]
pub fn create_vm_with_loader(options: &VmOptions, vm_loader: DynamicVmLoader) -> Result<()> {
    state::with_slot(|slot| {
        if slot.is_some() {
            return Err(Error::VmAlreadyRunning);
        }
        let (mut args, _strings, _raw_options) = options.build_args();
        let vm = vm_loader.create_java_vm(&mut args)?;
        // A JVM library can never be unloaded once a VM has run in it.
        std::mem::forget(vm_loader);
        *slot = Some(state::VmState { vm });
        info!("created a virtual machine");
        Ok(())
    })?;
    register_shutdown_hook();
    Ok(())
}

/// Destroys the installed VM, waiting for its non-daemon threads to finish.
/// The slot is cleared first, so concurrent [`attach`] calls start failing
/// with [`Error::VmShutdown`] immediately.
pub fn destroy_vm() -> Result<()> {
    let vm = state::with_slot(|slot| match slot.take() {
        Some(vm_state) => Ok(vm_state.vm),
        None => Err(Error::VmShutdown),
    })?;
    let destroy = java_vm_method!(vm, DestroyJavaVM);
    let rc = unsafe { destroy(vm) };
    if rc != sys::JNI_OK {
        return Err(Error::jni(format!(
            "DestroyJavaVM returned an error code of {rc}"
        )));
    }
    info!("destroyed the virtual machine");
    Ok(())
}

crate::java_proxy!(
    /// The Java half of the shutdown hook helper.
    struct ShutdownHook,
    "jproxy/util/ShutdownHook",
    "Ljproxy/util/ShutdownHook;"
);

static SHUTDOWN_HOOK_CLASS: ClassDesc =
    ClassDesc::new("jproxy/util/ShutdownHook", "Ljproxy/util/ShutdownHook;");
static SHUTDOWN_HOOK_GET_INSTANCE: StaticMethod<ShutdownHook> =
    StaticMethod::new(&SHUTDOWN_HOOK_CLASS, "getInstance");
static SHUTDOWN_HOOK_REGISTER: Method<JVoid> =
    Method::new(&SHUTDOWN_HOOK_CLASS, "registerIfNecessary");

/// Asks `jproxy.util.ShutdownHook` to register itself with the Java
/// runtime, so a Java-initiated shutdown reaches
/// [`Java_jproxy_util_ShutdownHook_signalVmShutdown`]. Classpaths without
/// the helper jar just lose shutdown detection; that is logged, not fatal.
fn register_shutdown_hook() {
    match try_register_shutdown_hook() {
        Ok(()) => debug!("registered the VM shutdown hook"),
        Err(e) => warn!(
            "unable to register the VM shutdown hook; a Java-initiated \
             shutdown will not be detected: {e}"
        ),
    }
}

fn try_register_shutdown_hook() -> Result<()> {
    let env = attach()?;
    let hook = SHUTDOWN_HOOK_GET_INSTANCE.call(&env, &Args::new())?;
    SHUTDOWN_HOOK_REGISTER.call(&env, hook.as_object(), &Args::new())?;
    Ok(())
}

/// Native half of the `jproxy.util.ShutdownHook` Java class. The hook runs
/// while the JVM shuts down on its own; from that point on every operation
/// needing the VM reports [`Error::VmShutdown`] instead of touching it.
#[no_mangle]
#[allow(non_snake_case)]
pub extern "system" fn Java_jproxy_util_ShutdownHook_signalVmShutdown(
    _env: *mut sys::JNIEnv,
    _class: sys::jclass,
) {
    state::with_slot(|slot| {
        *slot = None;
    });
    info!("the virtual machine announced shutdown");
}
