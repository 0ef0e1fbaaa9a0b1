//! Error types for the binding layer and for translated Java exceptions.

use std::any::Any;
use std::fmt;

use crate::proxy::Object;

/// Result type alias using the crate-wide [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced at the native/JVM boundary.
///
/// Any call that leaves a Java exception pending is surfaced as
/// [`Error::Java`] carrying the translated exception; everything else is an
/// infrastructure failure of the binding layer itself.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic failure of an underlying JNI primitive: class or member not
    /// found, reference allocation failure, invocation infrastructure
    /// failure. Secondary failures are chained through `source`.
    #[error("JNI error: {message}")]
    Jni {
        /// Human-readable description of the failed operation.
        message: String,
        /// Secondary failure that caused this one, if any.
        #[source]
        source: Option<Box<Error>>,
    },

    /// The virtual machine is not installed (never created, destroyed, or
    /// shut down from the Java side). Objects referencing it are no longer
    /// usable.
    #[error("the virtual machine is shut down")]
    VmShutdown,

    /// A VM is already installed in this process.
    #[error("the virtual machine is already running")]
    VmAlreadyRunning,

    /// A Java exception was thrown and translated into its registered
    /// native proxy type.
    #[error(transparent)]
    Java(#[from] JavaError),

    /// A type signature string could not be parsed.
    #[error("malformed type signature: {0}")]
    InvalidSignature(String),

    /// A JNIEnv function pointer was null in the interface table.
    #[error("JNIEnv null method pointer for {0}")]
    JniEnvMethodNotFound(&'static str),

    /// A JavaVM function pointer was null in the interface table.
    #[error("JavaVM null method pointer for {0}")]
    JavaVmMethodNotFound(&'static str),

    /// Unexpected null pointer.
    #[error("null pointer in {0}")]
    NullPtr(&'static str),

    /// Unexpected null dereference target.
    #[error("null pointer deref in {0}")]
    NullDeref(&'static str),
}

impl Error {
    /// Builds a [`Error::Jni`] with no underlying cause.
    pub fn jni(message: impl Into<String>) -> Self {
        Error::Jni {
            message: message.into(),
            source: None,
        }
    }

    /// Builds a [`Error::Jni`] chained with a causing error.
    pub fn jni_with(message: impl Into<String>, cause: Error) -> Self {
        Error::Jni {
            message: message.into(),
            source: Some(Box::new(cause)),
        }
    }
}

/// A Java exception reconstructed as a native value.
///
/// The boxed payload preserves the exact dynamic type chosen by the factory
/// registry, so callers can recover the concrete proxy with
/// [`downcast_ref`](JavaError::downcast_ref) rather than matching on a
/// generic supertype.
#[derive(Debug)]
pub struct JavaError {
    inner: Box<dyn ThrownException>,
}

impl JavaError {
    /// Wraps a concrete thrown-exception proxy.
    pub fn new<T: ThrownException>(exception: T) -> Self {
        JavaError {
            inner: Box::new(exception),
        }
    }

    /// The binary (dot-separated) name of the thrown Java class this error
    /// was translated through. For an unregistered exception this is the
    /// runtime class name captured at translation time.
    pub fn class_name(&self) -> &str {
        self.inner.class_name()
    }

    /// The thrown Java object.
    pub fn as_object(&self) -> &Object {
        self.inner.as_object()
    }

    /// Returns the payload as the concrete proxy type, if it is one.
    pub fn downcast_ref<T: ThrownException>(&self) -> Option<&T> {
        self.inner.as_any().downcast_ref::<T>()
    }

    /// True if the payload has the exact dynamic type `T`.
    pub fn is<T: ThrownException>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }
}

impl fmt::Display for JavaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl std::error::Error for JavaError {}

/// Implemented by every native proxy type that can stand in for a thrown
/// Java exception.
pub trait ThrownException: std::error::Error + Send + Sync + Any + 'static {
    /// Binary (dot-separated) name of the proxied Java class.
    fn class_name(&self) -> &str;

    /// The thrown instance, held as a global reference.
    fn as_object(&self) -> &Object;

    /// Upcast used by [`JavaError::downcast_ref`].
    fn as_any(&self) -> &dyn Any;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn jni_error_chains_cause() {
        let cause = Error::jni("inner failure");
        let err = Error::jni_with("outer failure", cause);
        assert_eq!(err.to_string(), "JNI error: outer failure");
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "JNI error: inner failure");
    }

    #[test]
    fn shutdown_and_running_are_distinct() {
        assert_ne!(
            Error::VmShutdown.to_string(),
            Error::VmAlreadyRunning.to_string()
        );
    }
}
