#![cfg(feature = "invocation")]

use assert_matches::assert_matches;
use rusty_fork::rusty_fork_test;

use jproxy::vm::{self, AttachConfig, VmOptions};
use jproxy::{sys, Error};

// Each test owns the process-wide VM slot, so they run in forked processes.
rusty_fork_test! {
    #[test]
    fn create_use_destroy() {
        assert!(!vm::is_running());
        assert_matches!(vm::attach(), Err(Error::VmShutdown));

        vm::create_vm(&VmOptions::new()).unwrap();
        assert!(vm::is_running());
        assert_matches!(vm::create_vm(&VmOptions::new()), Err(Error::VmAlreadyRunning));

        let env = vm::attach().unwrap();
        assert!(env.version().unwrap() >= sys::JNI_VERSION_1_6);
        // attaching an attached thread hands back the same environment
        let again = vm::attach().unwrap();
        assert_eq!(env.as_raw(), again.as_raw());

        vm::destroy_vm().unwrap();
        assert!(!vm::is_running());
        assert_matches!(vm::attach(), Err(Error::VmShutdown));
        assert_matches!(vm::destroy_vm(), Err(Error::VmShutdown));
    }

    #[test]
    fn worker_threads_attach_and_detach() {
        vm::create_vm(&VmOptions::new()).unwrap();
        // the main thread was attached by the JVM itself, not by us
        assert_eq!(vm::threads_attached(), 0);

        let workers: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let config = AttachConfig::new().name(format!("worker-{i}"));
                    let _env = vm::attach_with(&config).unwrap();
                    assert!(vm::threads_attached() >= 1);
                    // even workers detach early; odd ones rely on thread exit
                    if i % 2 == 0 {
                        vm::detach();
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }
        assert_eq!(vm::threads_attached(), 0);
    }

    #[test]
    fn detach_is_a_no_op_for_unattached_threads() {
        vm::create_vm(&VmOptions::new()).unwrap();
        vm::detach();
        assert_eq!(vm::threads_attached(), 0);
        assert!(vm::is_running());
    }

    #[test]
    fn shutdown_signal_invalidates_the_vm() {
        vm::create_vm(&VmOptions::new()).unwrap();
        assert!(vm::is_running());

        // what the Java-side shutdown hook invokes
        vm::Java_jproxy_util_ShutdownHook_signalVmShutdown(
            std::ptr::null_mut(),
            std::ptr::null_mut(),
        );

        assert!(!vm::is_running());
        assert_matches!(vm::attach(), Err(Error::VmShutdown));
    }
}
