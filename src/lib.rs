//! Reference-safe, typed access to a Java virtual machine over raw JNI.
//!
//! The crate revolves around four pieces:
//!
//! * **VM lifecycle** ([`vm`]): one VM per process, created in-process
//!   (`invocation` feature) or adopted from a host JVM. Threads attach on
//!   demand and detach themselves when they exit.
//! * **Proxies** ([`proxy`]): [`Object`], [`JArray`] and friends pin a JVM
//!   object with a global reference shared between clones; the last clone
//!   releases it, attaching the releasing thread if needed.
//! * **Members** ([`invoke`]): methods, constructors and fields resolve
//!   their JNI IDs once, composing signatures from class descriptors, and
//!   cache them for the life of the process.
//! * **Exceptions** ([`bridge`], [`registry`]): every call that can throw is
//!   followed by a check that translates a pending Java exception into a
//!   typed native error through a factory registered for the nearest class
//!   in the throwable's hierarchy.
//!
//! ```ignore
//! use jproxy::{value::Args, vm};
//!
//! vm::create_vm(&vm::VmOptions::new().option("-Xcheck:jni"))?;
//! jproxy::throwables::register_built_in_throwables();
//!
//! let env = vm::attach()?;
//! # Ok::<(), jproxy::Error>(())
//! ```

#![warn(missing_docs)]

pub use jni_sys as sys;

#[macro_use]
mod macros;

pub mod bridge;
pub mod class;
pub mod env;
pub mod errors;
pub mod invoke;
pub mod proxy;
pub mod refs;
pub mod registry;
pub mod signature;
pub mod strings;
pub mod throwables;
pub mod types;
pub mod value;
pub mod vm;

pub use crate::env::Env;
pub use crate::errors::{Error, JavaError, Result, ThrownException};
pub use crate::proxy::{ElementProxy, FieldProxy, JArray, JString, Object, ObjectProxy};
pub use crate::refs::WeakRef;
pub use crate::value::{Args, ArrayElement, CallReturn, FieldValue, JavaValue};
