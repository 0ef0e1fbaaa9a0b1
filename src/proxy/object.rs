//! The root object proxy.
//!
//! An [`Object`] owns a global reference to a JVM object. Clones share the
//! reference through an `Arc`; the last clone releases it, attaching the
//! current thread if it is not already attached. A proxy may wrap null, in
//! which case there is nothing to release.

use std::sync::Arc;

use log::warn;

use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::refs;
use crate::sys;
use crate::value::{ArrayElement, CallReturn, FieldValue, JavaValue};
use crate::vm;

static OBJECT_CLASS: ClassDesc = ClassDesc::new("java/lang/Object", "Ljava/lang/Object;");

/// A shared handle to a JVM object, pinned by a global reference.
#[derive(Clone, Debug)]
pub struct Object {
    guard: Arc<RefGuard>,
}

#[derive(Debug)]
struct RefGuard {
    raw: sys::jobject,
}

// The guarded reference is global, valid on any attached thread.
unsafe impl Send for RefGuard {}
unsafe impl Sync for RefGuard {}

impl Object {
    /// A proxy wrapping the null reference.
    pub fn null() -> Self {
        Object {
            guard: Arc::new(RefGuard {
                raw: std::ptr::null_mut(),
            }),
        }
    }

    /// Takes ownership of a local reference: promotes it to a global
    /// reference and releases the local. A null input yields a null proxy.
    pub(crate) fn from_owned_local(env: &Env, local: sys::jobject) -> Result<Self> {
        if local.is_null() {
            return Ok(Object::null());
        }
        let global = match refs::new_global_ref(env, local) {
            Ok(global) => global,
            Err(e) => {
                // the consumed local must not linger until the frame returns
                refs::delete_local_ref(env, local).ok();
                return Err(e);
            }
        };
        refs::delete_local_ref(env, local)?;
        Ok(Object {
            guard: Arc::new(RefGuard { raw: global }),
        })
    }

    /// Wraps a reference owned by someone else, e.g. a parameter of a native
    /// method. The input is left untouched; the proxy gets its own global
    /// reference.
    pub fn from_borrowed(env: &Env, obj: sys::jobject) -> Result<Self> {
        if obj.is_null() {
            return Ok(Object::null());
        }
        let global = refs::new_global_ref(env, obj)?;
        Ok(Object {
            guard: Arc::new(RefGuard { raw: global }),
        })
    }

    /// The underlying reference. Null for a null proxy.
    pub fn as_raw(&self) -> sys::jobject {
        self.guard.raw
    }

    /// True if this proxy wraps the null reference.
    pub fn is_null(&self) -> bool {
        self.guard.raw.is_null()
    }

    /// Binary name of the object's runtime class, e.g.
    /// `"java.lang.IllegalStateException"`.
    pub fn class_name(&self, env: &Env) -> Result<String> {
        let raw = non_null!(self.guard.raw, "Object::class_name receiver");
        crate::bridge::class_name_of(env, raw)
    }

    /// Rebinds this handle to a different referent. The new reference is
    /// acquired before the old one is let go, so a failed acquisition leaves
    /// the handle on its old referent. Other clones keep the old referent;
    /// it is released once the last of them drops.
    pub fn set_raw(&mut self, env: &Env, obj: sys::jobject) -> Result<()> {
        *self = Object::from_borrowed(env, obj)?;
        Ok(())
    }
}

impl Drop for RefGuard {
    fn drop(&mut self) {
        if self.raw.is_null() {
            return;
        }
        match vm::attach() {
            Ok(env) => {
                if let Err(e) = refs::delete_global_ref(&env, self.raw) {
                    warn!("error dropping object reference: {e}");
                }
            }
            // VM already torn down; the reference died with it.
            Err(Error::VmShutdown) => {}
            Err(e) => warn!("unable to attach to drop object reference: {e}"),
        }
    }
}

impl JavaValue for Object {
    fn java_class() -> &'static ClassDesc {
        &OBJECT_CLASS
    }

    unsafe fn from_raw(env: &Env, value: sys::jvalue) -> Result<Self> {
        Object::from_owned_local(env, value.l)
    }

    fn as_raw(&self) -> sys::jvalue {
        sys::jvalue { l: self.guard.raw }
    }
}

impl CallReturn for Object {
    unsafe fn call_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue> {
        let call = jni_method!(env.as_raw(), CallObjectMethodA);
        let ret = call(env.as_raw(), obj, id, args);
        Ok(sys::jvalue { l: ret })
    }

    unsafe fn call_static_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue> {
        let call = jni_method!(env.as_raw(), CallStaticObjectMethodA);
        let ret = call(env.as_raw(), class, id, args);
        Ok(sys::jvalue { l: ret })
    }
}

impl FieldValue for Object {
    unsafe fn get_field_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jfieldID,
    ) -> Result<sys::jvalue> {
        let get = jni_method!(env.as_raw(), GetObjectField);
        let ret = get(env.as_raw(), obj, id);
        Ok(sys::jvalue { l: ret })
    }

    unsafe fn set_field_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jfieldID,
        value: sys::jvalue,
    ) -> Result<()> {
        let set = jni_method!(env.as_raw(), SetObjectField);
        set(env.as_raw(), obj, id, value.l);
        Ok(())
    }

    unsafe fn get_static_field_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jfieldID,
    ) -> Result<sys::jvalue> {
        let get = jni_method!(env.as_raw(), GetStaticObjectField);
        let ret = get(env.as_raw(), class, id);
        Ok(sys::jvalue { l: ret })
    }

    unsafe fn set_static_field_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jfieldID,
        value: sys::jvalue,
    ) -> Result<()> {
        let set = jni_method!(env.as_raw(), SetStaticObjectField);
        set(env.as_raw(), class, id, value.l);
        Ok(())
    }
}

impl ArrayElement for Object {
    unsafe fn get_element_raw(
        env: &Env,
        array: sys::jarray,
        index: sys::jsize,
    ) -> Result<sys::jvalue> {
        object_element_raw(env, array, index)
    }

    unsafe fn set_element_raw(
        env: &Env,
        array: sys::jarray,
        index: sys::jsize,
        value: sys::jvalue,
    ) -> Result<()> {
        set_object_element_raw(env, array, index, value)
    }

    unsafe fn new_array_raw(env: &Env, len: sys::jsize) -> Result<sys::jarray> {
        new_object_array_raw(env, len, Self::java_class())
    }
}

// Object-kind array primitives, shared by `Object` and by the impls that
// `java_proxy!` expands in downstream crates.

#[doc(hidden)]
pub unsafe fn object_element_raw(
    env: &Env,
    array: sys::jarray,
    index: sys::jsize,
) -> Result<sys::jvalue> {
    let get = jni_method!(env.as_raw(), GetObjectArrayElement);
    let ret = get(env.as_raw(), array, index);
    Ok(sys::jvalue { l: ret })
}

#[doc(hidden)]
pub unsafe fn set_object_element_raw(
    env: &Env,
    array: sys::jarray,
    index: sys::jsize,
    value: sys::jvalue,
) -> Result<()> {
    let set = jni_method!(env.as_raw(), SetObjectArrayElement);
    set(env.as_raw(), array, index, value.l);
    Ok(())
}

#[doc(hidden)]
pub unsafe fn new_object_array_raw(
    env: &Env,
    len: sys::jsize,
    element_class: &ClassDesc,
) -> Result<sys::jarray> {
    let class = element_class.get(env)?;
    let new_array = jni_method!(env.as_raw(), NewObjectArray);
    let array = new_array(env.as_raw(), len, class, std::ptr::null_mut());
    Ok(non_null!(array, "NewObjectArray result"))
}

/// A typed proxy wrapping an [`Object`].
///
/// Implemented by the types `java_proxy!` generates; the registry and the
/// exception bridge use it to move between the typed and untyped views.
pub trait ObjectProxy: Sized {
    /// Wraps an untyped object without a runtime type check.
    fn from_object(object: Object) -> Self;

    /// The untyped view.
    fn as_object(&self) -> &Object;

    /// Unwraps back to the untyped object.
    fn into_object(self) -> Object;
}

/// Defines a typed proxy for one Java class: a newtype over [`Object`] with
/// the class identity and the value/member trait impls wired through.
///
/// ```ignore
/// java_proxy!(pub struct BigDecimal, "java/math/BigDecimal", "Ljava/math/BigDecimal;");
/// ```
#[macro_export]
macro_rules! java_proxy {
    ($(#[$meta:meta])* $vis:vis struct $name:ident, $jni_name:literal, $sig:literal) => {
        $(#[$meta])*
        #[derive(Clone)]
        $vis struct $name {
            object: $crate::proxy::Object,
        }

        impl $name {
            /// Descriptor of this proxy's Java class.
            pub fn java_class() -> &'static $crate::class::ClassDesc {
                static CLASS: $crate::class::ClassDesc =
                    $crate::class::ClassDesc::new($jni_name, $sig);
                &CLASS
            }
        }

        impl $crate::proxy::ObjectProxy for $name {
            fn from_object(object: $crate::proxy::Object) -> Self {
                $name { object }
            }

            fn as_object(&self) -> &$crate::proxy::Object {
                &self.object
            }

            fn into_object(self) -> $crate::proxy::Object {
                self.object
            }
        }

        impl $crate::value::JavaValue for $name {
            fn java_class() -> &'static $crate::class::ClassDesc {
                $name::java_class()
            }

            unsafe fn from_raw(
                env: &$crate::env::Env,
                value: $crate::sys::jvalue,
            ) -> $crate::errors::Result<Self> {
                let object =
                    <$crate::proxy::Object as $crate::value::JavaValue>::from_raw(env, value)?;
                Ok(<Self as $crate::proxy::ObjectProxy>::from_object(object))
            }

            fn as_raw(&self) -> $crate::sys::jvalue {
                $crate::value::JavaValue::as_raw(&self.object)
            }
        }

        impl $crate::value::CallReturn for $name {
            unsafe fn call_raw(
                env: &$crate::env::Env,
                obj: $crate::sys::jobject,
                id: $crate::sys::jmethodID,
                args: *const $crate::sys::jvalue,
            ) -> $crate::errors::Result<$crate::sys::jvalue> {
                <$crate::proxy::Object as $crate::value::CallReturn>::call_raw(env, obj, id, args)
            }

            unsafe fn call_static_raw(
                env: &$crate::env::Env,
                class: $crate::sys::jclass,
                id: $crate::sys::jmethodID,
                args: *const $crate::sys::jvalue,
            ) -> $crate::errors::Result<$crate::sys::jvalue> {
                <$crate::proxy::Object as $crate::value::CallReturn>::call_static_raw(
                    env, class, id, args,
                )
            }
        }

        impl $crate::value::FieldValue for $name {
            unsafe fn get_field_raw(
                env: &$crate::env::Env,
                obj: $crate::sys::jobject,
                id: $crate::sys::jfieldID,
            ) -> $crate::errors::Result<$crate::sys::jvalue> {
                <$crate::proxy::Object as $crate::value::FieldValue>::get_field_raw(env, obj, id)
            }

            unsafe fn set_field_raw(
                env: &$crate::env::Env,
                obj: $crate::sys::jobject,
                id: $crate::sys::jfieldID,
                value: $crate::sys::jvalue,
            ) -> $crate::errors::Result<()> {
                <$crate::proxy::Object as $crate::value::FieldValue>::set_field_raw(
                    env, obj, id, value,
                )
            }

            unsafe fn get_static_field_raw(
                env: &$crate::env::Env,
                class: $crate::sys::jclass,
                id: $crate::sys::jfieldID,
            ) -> $crate::errors::Result<$crate::sys::jvalue> {
                <$crate::proxy::Object as $crate::value::FieldValue>::get_static_field_raw(
                    env, class, id,
                )
            }

            unsafe fn set_static_field_raw(
                env: &$crate::env::Env,
                class: $crate::sys::jclass,
                id: $crate::sys::jfieldID,
                value: $crate::sys::jvalue,
            ) -> $crate::errors::Result<()> {
                <$crate::proxy::Object as $crate::value::FieldValue>::set_static_field_raw(
                    env, class, id, value,
                )
            }
        }

        impl $crate::value::ArrayElement for $name {
            unsafe fn get_element_raw(
                env: &$crate::env::Env,
                array: $crate::sys::jarray,
                index: $crate::sys::jsize,
            ) -> $crate::errors::Result<$crate::sys::jvalue> {
                $crate::proxy::object_element_raw(env, array, index)
            }

            unsafe fn set_element_raw(
                env: &$crate::env::Env,
                array: $crate::sys::jarray,
                index: $crate::sys::jsize,
                value: $crate::sys::jvalue,
            ) -> $crate::errors::Result<()> {
                $crate::proxy::set_object_element_raw(env, array, index, value)
            }

            unsafe fn new_array_raw(
                env: &$crate::env::Env,
                len: $crate::sys::jsize,
            ) -> $crate::errors::Result<$crate::sys::jarray> {
                $crate::proxy::new_object_array_raw(env, len, $name::java_class())
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_proxy() {
        let obj = Object::null();
        assert!(obj.is_null());
        assert!(obj.as_raw().is_null());
        let clone = obj.clone();
        assert!(clone.is_null());
    }

    #[test]
    fn object_class_identity() {
        assert_eq!(Object::java_class().name(), "java/lang/Object");
        assert_eq!(Object::java_class().type_sig(), "Ljava/lang/Object;");
    }
}
