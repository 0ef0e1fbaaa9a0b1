use std::sync::Once;

use jproxy::throwables::register_built_in_throwables;
use jproxy::{vm, Env};

/// Boots one VM for the whole test binary on first use and attaches the
/// calling thread.
pub fn attach() -> Env {
    static BOOT: Once = Once::new();
    BOOT.call_once(|| {
        vm::create_vm(&vm::VmOptions::new().option("-Xcheck:jni"))
            .expect("unable to create a virtual machine for the test run");
        register_built_in_throwables();
    });
    vm::attach().expect("unable to attach the current thread")
}
