//! Typed wrappers for the Java primitives.
//!
//! Each wrapper pairs a raw `jni-sys` scalar with its type descriptor and the
//! kind-matched JNI primitives, generated below from one table. `JVoid` is a
//! return-only type: it can terminate a call but is not a field or array
//! element.

use paste::paste;

use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::Result;
use crate::sys;
use crate::value::{ArrayElement, CallReturn, FieldValue, JavaValue};

macro_rules! primitive_value {
    ($name:ident, $raw:ty, $field:ident, $kind:ident, $java_name:literal, $sig:literal) => {
        paste! {
            #[doc = "The Java `" $java_name "` primitive."]
            #[derive(Clone, Copy, Debug, PartialEq)]
            pub struct $name(pub $raw);

            static [<$name:upper _CLASS>]: ClassDesc = ClassDesc::new($java_name, $sig);

            impl From<$raw> for $name {
                fn from(value: $raw) -> Self {
                    $name(value)
                }
            }

            impl From<$name> for $raw {
                fn from(value: $name) -> Self {
                    value.0
                }
            }

            impl JavaValue for $name {
                fn java_class() -> &'static ClassDesc {
                    &[<$name:upper _CLASS>]
                }

                unsafe fn from_raw(_env: &Env, value: sys::jvalue) -> Result<Self> {
                    Ok($name(value.$field))
                }

                fn as_raw(&self) -> sys::jvalue {
                    sys::jvalue { $field: self.0 }
                }
            }

            impl CallReturn for $name {
                unsafe fn call_raw(
                    env: &Env,
                    obj: sys::jobject,
                    id: sys::jmethodID,
                    args: *const sys::jvalue,
                ) -> Result<sys::jvalue> {
                    let call = jni_method!(env.as_raw(), [<Call $kind MethodA>]);
                    let ret = call(env.as_raw(), obj, id, args);
                    Ok(sys::jvalue { $field: ret })
                }

                unsafe fn call_static_raw(
                    env: &Env,
                    class: sys::jclass,
                    id: sys::jmethodID,
                    args: *const sys::jvalue,
                ) -> Result<sys::jvalue> {
                    let call = jni_method!(env.as_raw(), [<CallStatic $kind MethodA>]);
                    let ret = call(env.as_raw(), class, id, args);
                    Ok(sys::jvalue { $field: ret })
                }
            }

            impl FieldValue for $name {
                unsafe fn get_field_raw(
                    env: &Env,
                    obj: sys::jobject,
                    id: sys::jfieldID,
                ) -> Result<sys::jvalue> {
                    let get = jni_method!(env.as_raw(), [<Get $kind Field>]);
                    let ret = get(env.as_raw(), obj, id);
                    Ok(sys::jvalue { $field: ret })
                }

                unsafe fn set_field_raw(
                    env: &Env,
                    obj: sys::jobject,
                    id: sys::jfieldID,
                    value: sys::jvalue,
                ) -> Result<()> {
                    let set = jni_method!(env.as_raw(), [<Set $kind Field>]);
                    set(env.as_raw(), obj, id, value.$field);
                    Ok(())
                }

                unsafe fn get_static_field_raw(
                    env: &Env,
                    class: sys::jclass,
                    id: sys::jfieldID,
                ) -> Result<sys::jvalue> {
                    let get = jni_method!(env.as_raw(), [<GetStatic $kind Field>]);
                    let ret = get(env.as_raw(), class, id);
                    Ok(sys::jvalue { $field: ret })
                }

                unsafe fn set_static_field_raw(
                    env: &Env,
                    class: sys::jclass,
                    id: sys::jfieldID,
                    value: sys::jvalue,
                ) -> Result<()> {
                    let set = jni_method!(env.as_raw(), [<SetStatic $kind Field>]);
                    set(env.as_raw(), class, id, value.$field);
                    Ok(())
                }
            }

            impl ArrayElement for $name {
                unsafe fn get_element_raw(
                    env: &Env,
                    array: sys::jarray,
                    index: sys::jsize,
                ) -> Result<sys::jvalue> {
                    let get_region = jni_method!(env.as_raw(), [<Get $kind ArrayRegion>]);
                    let mut buf: $raw = Default::default();
                    get_region(env.as_raw(), array, index, 1, &mut buf);
                    Ok(sys::jvalue { $field: buf })
                }

                unsafe fn set_element_raw(
                    env: &Env,
                    array: sys::jarray,
                    index: sys::jsize,
                    value: sys::jvalue,
                ) -> Result<()> {
                    let set_region = jni_method!(env.as_raw(), [<Set $kind ArrayRegion>]);
                    set_region(env.as_raw(), array, index, 1, &value.$field);
                    Ok(())
                }

                unsafe fn new_array_raw(env: &Env, len: sys::jsize) -> Result<sys::jarray> {
                    let new_array = jni_method!(env.as_raw(), [<New $kind Array>]);
                    let array = new_array(env.as_raw(), len);
                    Ok(non_null!(
                        array,
                        concat!("New", stringify!($kind), "Array result")
                    ))
                }
            }
        }
    };
}

primitive_value!(JBoolean, sys::jboolean, z, Boolean, "boolean", "Z");
primitive_value!(JByte, sys::jbyte, b, Byte, "byte", "B");
primitive_value!(JChar, sys::jchar, c, Char, "char", "C");
primitive_value!(JShort, sys::jshort, s, Short, "short", "S");
primitive_value!(JInt, sys::jint, i, Int, "int", "I");
primitive_value!(JLong, sys::jlong, j, Long, "long", "J");
primitive_value!(JFloat, sys::jfloat, f, Float, "float", "F");
primitive_value!(JDouble, sys::jdouble, d, Double, "double", "D");

impl JBoolean {
    /// True if this is `JNI_TRUE`.
    pub fn is_true(self) -> bool {
        self.0 == sys::JNI_TRUE
    }
}

impl From<bool> for JBoolean {
    fn from(value: bool) -> Self {
        JBoolean(if value { sys::JNI_TRUE } else { sys::JNI_FALSE })
    }
}

/// The Java `void` type. Only valid as a method return.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JVoid;

static JVOID_CLASS: ClassDesc = ClassDesc::new("void", "V");

impl JavaValue for JVoid {
    fn java_class() -> &'static ClassDesc {
        &JVOID_CLASS
    }

    unsafe fn from_raw(_env: &Env, _value: sys::jvalue) -> Result<Self> {
        Ok(JVoid)
    }

    fn as_raw(&self) -> sys::jvalue {
        sys::jvalue {
            l: std::ptr::null_mut(),
        }
    }
}

impl CallReturn for JVoid {
    unsafe fn call_raw(
        env: &Env,
        obj: sys::jobject,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue> {
        let call = jni_method!(env.as_raw(), CallVoidMethodA);
        call(env.as_raw(), obj, id, args);
        Ok(sys::jvalue {
            l: std::ptr::null_mut(),
        })
    }

    unsafe fn call_static_raw(
        env: &Env,
        class: sys::jclass,
        id: sys::jmethodID,
        args: *const sys::jvalue,
    ) -> Result<sys::jvalue> {
        let call = jni_method!(env.as_raw(), CallStaticVoidMethodA);
        call(env.as_raw(), class, id, args);
        Ok(sys::jvalue {
            l: std::ptr::null_mut(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_descriptors() {
        assert_eq!(JBoolean::java_class().type_sig(), "Z");
        assert_eq!(JInt::java_class().type_sig(), "I");
        assert_eq!(JDouble::java_class().type_sig(), "D");
        assert_eq!(JVoid::java_class().type_sig(), "V");
        assert_eq!(JLong::java_class().name(), "long");
    }

    #[test]
    fn jvalue_round_trip() {
        let v = JInt(42).as_raw();
        assert_eq!(unsafe { v.i }, 42);
        let v = JDouble(-0.5).as_raw();
        assert_eq!(unsafe { v.d }, -0.5);
    }

    #[test]
    fn boolean_conversions() {
        assert!(JBoolean::from(true).is_true());
        assert!(!JBoolean::from(false).is_true());
        assert_eq!(unsafe { JBoolean::from(true).as_raw().z }, sys::JNI_TRUE);
    }
}
