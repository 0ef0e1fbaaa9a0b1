//! The process-wide VM slot.
//!
//! JNI allows at most one virtual machine per process; everything here
//! serializes on one mutex guarding the single slot. The slot being empty
//! means the VM was never installed, was destroyed, or announced shutdown
//! from the Java side; all three read as [`Error::VmShutdown`] to callers.

use std::sync::Mutex;

use crate::errors::{Error, Result};
use crate::sys;

pub(crate) struct VmState {
    pub(crate) vm: *mut sys::JavaVM,
}

// The JavaVM pointer is process-global and valid from any thread.
unsafe impl Send for VmState {}

static VM: Mutex<Option<VmState>> = Mutex::new(None);

/// Runs `f` with exclusive access to the VM slot.
pub(crate) fn with_slot<R>(f: impl FnOnce(&mut Option<VmState>) -> R) -> R {
    let mut slot = VM.lock().unwrap_or_else(|e| e.into_inner());
    f(&mut slot)
}

/// Installs a VM into the slot.
pub(crate) fn install(vm: *mut sys::JavaVM) -> Result<()> {
    with_slot(|slot| {
        if slot.is_some() {
            return Err(Error::VmAlreadyRunning);
        }
        *slot = Some(VmState { vm });
        Ok(())
    })
}

/// The installed VM pointer, or [`Error::VmShutdown`].
pub(crate) fn current_vm() -> Result<*mut sys::JavaVM> {
    with_slot(|slot| match slot {
        Some(state) => Ok(state.vm),
        None => Err(Error::VmShutdown),
    })
}

/// True while a VM is installed.
pub fn is_running() -> bool {
    with_slot(|slot| slot.is_some())
}
