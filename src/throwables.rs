//! Native proxies for the core `java.lang` throwables.
//!
//! Each type wraps the thrown object and eagerly captures its message, so
//! the error stays printable after the exception has been cleared on the
//! Java side. [`register_built_in_throwables`] installs the factories for
//! all of them; applications register their own exception classes alongside
//! during startup.

use std::any::Any;
use std::fmt;

use crate::bridge;
use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::{JavaError, Result, ThrownException};
use crate::proxy::Object;
use crate::registry;

macro_rules! built_in_throwable {
    ($(#[$meta:meta])* $name:ident, $jni_name:literal, $sig:literal, $binary_name:literal) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            object: Object,
            message: Option<String>,
        }

        impl $name {
            /// Descriptor of the proxied Java class.
            pub fn java_class() -> &'static ClassDesc {
                static CLASS: ClassDesc = ClassDesc::new($jni_name, $sig);
                &CLASS
            }

            /// The captured `getMessage()` text, if the throwable had one.
            pub fn message(&self) -> Option<&str> {
                self.message.as_deref()
            }

            pub(crate) fn factory(env: &Env, object: Object) -> Result<JavaError> {
                let message = bridge::throwable_message(env, object.as_raw())?;
                Ok(JavaError::new($name { object, message }))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match &self.message {
                    Some(message) => write!(f, "{}: {message}", $binary_name),
                    None => f.write_str($binary_name),
                }
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.debug_struct(stringify!($name))
                    .field("message", &self.message)
                    .finish()
            }
        }

        impl std::error::Error for $name {}

        impl ThrownException for $name {
            fn class_name(&self) -> &str {
                $binary_name
            }

            fn as_object(&self) -> &Object {
                &self.object
            }

            fn as_any(&self) -> &dyn Any {
                self
            }
        }
    };
}

built_in_throwable!(
    /// `java.lang.Throwable`, the root of every translation walk.
    Throwable,
    "java/lang/Throwable",
    "Ljava/lang/Throwable;",
    "java.lang.Throwable"
);
built_in_throwable!(
    /// `java.lang.Error`.
    JavaLangError,
    "java/lang/Error",
    "Ljava/lang/Error;",
    "java.lang.Error"
);
built_in_throwable!(
    /// `java.lang.Exception`.
    Exception,
    "java/lang/Exception",
    "Ljava/lang/Exception;",
    "java.lang.Exception"
);
built_in_throwable!(
    /// `java.lang.RuntimeException`. Also the class used when raising a
    /// non-Java native error back into the JVM.
    RuntimeException,
    "java/lang/RuntimeException",
    "Ljava/lang/RuntimeException;",
    "java.lang.RuntimeException"
);
built_in_throwable!(
    /// `java.lang.NullPointerException`.
    NullPointerException,
    "java/lang/NullPointerException",
    "Ljava/lang/NullPointerException;",
    "java.lang.NullPointerException"
);
built_in_throwable!(
    /// `java.lang.IllegalArgumentException`.
    IllegalArgumentException,
    "java/lang/IllegalArgumentException",
    "Ljava/lang/IllegalArgumentException;",
    "java.lang.IllegalArgumentException"
);
built_in_throwable!(
    /// `java.lang.IllegalStateException`.
    IllegalStateException,
    "java/lang/IllegalStateException",
    "Ljava/lang/IllegalStateException;",
    "java.lang.IllegalStateException"
);
built_in_throwable!(
    /// `java.lang.ClassCastException`.
    ClassCastException,
    "java/lang/ClassCastException",
    "Ljava/lang/ClassCastException;",
    "java.lang.ClassCastException"
);
built_in_throwable!(
    /// `java.lang.IndexOutOfBoundsException`.
    IndexOutOfBoundsException,
    "java/lang/IndexOutOfBoundsException",
    "Ljava/lang/IndexOutOfBoundsException;",
    "java.lang.IndexOutOfBoundsException"
);
built_in_throwable!(
    /// `java.lang.ArrayIndexOutOfBoundsException`.
    ArrayIndexOutOfBoundsException,
    "java/lang/ArrayIndexOutOfBoundsException",
    "Ljava/lang/ArrayIndexOutOfBoundsException;",
    "java.lang.ArrayIndexOutOfBoundsException"
);
built_in_throwable!(
    /// `java.lang.ArithmeticException`.
    ArithmeticException,
    "java/lang/ArithmeticException",
    "Ljava/lang/ArithmeticException;",
    "java.lang.ArithmeticException"
);
built_in_throwable!(
    /// `java.lang.UnsupportedOperationException`.
    UnsupportedOperationException,
    "java/lang/UnsupportedOperationException",
    "Ljava/lang/UnsupportedOperationException;",
    "java.lang.UnsupportedOperationException"
);
built_in_throwable!(
    /// `java.lang.NumberFormatException`.
    NumberFormatException,
    "java/lang/NumberFormatException",
    "Ljava/lang/NumberFormatException;",
    "java.lang.NumberFormatException"
);
built_in_throwable!(
    /// `java.lang.ClassNotFoundException`.
    ClassNotFoundException,
    "java/lang/ClassNotFoundException",
    "Ljava/lang/ClassNotFoundException;",
    "java.lang.ClassNotFoundException"
);
built_in_throwable!(
    /// `java.lang.NoSuchMethodError`.
    NoSuchMethodError,
    "java/lang/NoSuchMethodError",
    "Ljava/lang/NoSuchMethodError;",
    "java.lang.NoSuchMethodError"
);
built_in_throwable!(
    /// `java.lang.NoSuchFieldError`.
    NoSuchFieldError,
    "java/lang/NoSuchFieldError",
    "Ljava/lang/NoSuchFieldError;",
    "java.lang.NoSuchFieldError"
);
built_in_throwable!(
    /// `java.lang.NoClassDefFoundError`.
    NoClassDefFoundError,
    "java/lang/NoClassDefFoundError",
    "Ljava/lang/NoClassDefFoundError;",
    "java.lang.NoClassDefFoundError"
);
built_in_throwable!(
    /// `java.lang.OutOfMemoryError`.
    OutOfMemoryError,
    "java/lang/OutOfMemoryError",
    "Ljava/lang/OutOfMemoryError;",
    "java.lang.OutOfMemoryError"
);

/// Registers the factories for every proxy in this module. Call once during
/// startup, before concurrent invocation begins; until then, thrown
/// exceptions fall back to [`UnknownThrowable`].
pub fn register_built_in_throwables() {
    registry::register("java.lang.Throwable", Throwable::factory);
    registry::register("java.lang.Error", JavaLangError::factory);
    registry::register("java.lang.Exception", Exception::factory);
    registry::register("java.lang.RuntimeException", RuntimeException::factory);
    registry::register("java.lang.NullPointerException", NullPointerException::factory);
    registry::register(
        "java.lang.IllegalArgumentException",
        IllegalArgumentException::factory,
    );
    registry::register(
        "java.lang.IllegalStateException",
        IllegalStateException::factory,
    );
    registry::register("java.lang.ClassCastException", ClassCastException::factory);
    registry::register(
        "java.lang.IndexOutOfBoundsException",
        IndexOutOfBoundsException::factory,
    );
    registry::register(
        "java.lang.ArrayIndexOutOfBoundsException",
        ArrayIndexOutOfBoundsException::factory,
    );
    registry::register("java.lang.ArithmeticException", ArithmeticException::factory);
    registry::register(
        "java.lang.UnsupportedOperationException",
        UnsupportedOperationException::factory,
    );
    registry::register(
        "java.lang.NumberFormatException",
        NumberFormatException::factory,
    );
    registry::register(
        "java.lang.ClassNotFoundException",
        ClassNotFoundException::factory,
    );
    registry::register("java.lang.NoSuchMethodError", NoSuchMethodError::factory);
    registry::register("java.lang.NoSuchFieldError", NoSuchFieldError::factory);
    registry::register(
        "java.lang.NoClassDefFoundError",
        NoClassDefFoundError::factory,
    );
    registry::register("java.lang.OutOfMemoryError", OutOfMemoryError::factory);
}

/// Generic capture of a throwable whose hierarchy has no registered factory.
/// Keeps the runtime class name and message; the object itself stays pinned
/// for callers that want to rethrow or inspect it.
#[derive(Clone)]
pub struct UnknownThrowable {
    object: Object,
    class_name: String,
    message: Option<String>,
}

impl UnknownThrowable {
    pub(crate) fn capture(env: &Env, object: Object) -> Result<Self> {
        let class_name = bridge::class_name_of(env, object.as_raw())?;
        let message = bridge::throwable_message(env, object.as_raw())?;
        Ok(UnknownThrowable {
            object,
            class_name,
            message,
        })
    }

    /// The captured `getMessage()` text, if any.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for UnknownThrowable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {message}", self.class_name),
            None => f.write_str(&self.class_name),
        }
    }
}

impl fmt::Debug for UnknownThrowable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnknownThrowable")
            .field("class_name", &self.class_name)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for UnknownThrowable {}

impl ThrownException for UnknownThrowable {
    fn class_name(&self) -> &str {
        &self.class_name
    }

    fn as_object(&self) -> &Object {
        &self.object
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
