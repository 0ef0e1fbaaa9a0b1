//! Instance and static field access.

use std::marker::PhantomData;

use once_cell::sync::OnceCell;

use crate::bridge;
use crate::class::ClassDesc;
use crate::env::Env;
use crate::errors::{Error, Result};
use crate::invoke::FieldId;
use crate::proxy::Object;
use crate::signature::JavaType;
use crate::strings::JniString;
use crate::value::{FieldValue, JavaValue};

/// One instance field of type `T`, with the field ID cached after first use.
pub struct Field<T: FieldValue> {
    class: &'static ClassDesc,
    name: &'static str,
    id: OnceCell<FieldId>,
    _value: PhantomData<T>,
}

impl<T: FieldValue> Field<T> {
    /// Creates an unresolved field. `const` so generated code can keep one
    /// in a `static` per proxy field.
    pub const fn new(class: &'static ClassDesc, name: &'static str) -> Self {
        Field {
            class,
            name,
            id: OnceCell::new(),
            _value: PhantomData,
        }
    }

    /// Reads the field from `obj`.
    pub fn get(&self, env: &Env, obj: &Object) -> Result<T> {
        let raw = non_null!(obj.as_raw(), "Field::get receiver");
        let id = self.id(env)?;
        let value = unsafe { T::get_field_raw(env, raw, id.raw)? };
        bridge::check_and_raise(env)?;
        unsafe { T::from_raw(env, value) }
    }

    /// Writes `value` into the field of `obj`.
    pub fn set(&self, env: &Env, obj: &Object, value: &T) -> Result<()> {
        let raw = non_null!(obj.as_raw(), "Field::set receiver");
        let id = self.id(env)?;
        unsafe { T::set_field_raw(env, raw, id.raw, value.as_raw())? };
        bridge::check_and_raise(env)
    }

    fn id(&self, env: &Env) -> Result<FieldId> {
        self.id
            .get_or_try_init(|| resolve(env, self.class, self.name, T::java_class(), false))
            .copied()
    }
}

/// One static field of type `T`.
pub struct StaticField<T: FieldValue> {
    class: &'static ClassDesc,
    name: &'static str,
    id: OnceCell<FieldId>,
    _value: PhantomData<T>,
}

impl<T: FieldValue> StaticField<T> {
    /// Creates an unresolved static field.
    pub const fn new(class: &'static ClassDesc, name: &'static str) -> Self {
        StaticField {
            class,
            name,
            id: OnceCell::new(),
            _value: PhantomData,
        }
    }

    /// Reads the field.
    pub fn get(&self, env: &Env) -> Result<T> {
        let class = self.class.get(env)?;
        let id = self.id(env)?;
        let value = unsafe { T::get_static_field_raw(env, class, id.raw)? };
        bridge::check_and_raise(env)?;
        unsafe { T::from_raw(env, value) }
    }

    /// Writes `value` into the field.
    pub fn set(&self, env: &Env, value: &T) -> Result<()> {
        let class = self.class.get(env)?;
        let id = self.id(env)?;
        unsafe { T::set_static_field_raw(env, class, id.raw, value.as_raw())? };
        bridge::check_and_raise(env)
    }

    fn id(&self, env: &Env) -> Result<FieldId> {
        self.id
            .get_or_try_init(|| resolve(env, self.class, self.name, T::java_class(), true))
            .copied()
    }
}

fn resolve(
    env: &Env,
    class: &'static ClassDesc,
    name: &'static str,
    value_class: &'static ClassDesc,
    is_static: bool,
) -> Result<FieldId> {
    // Reject a malformed descriptor before handing it to the JVM.
    let signature: JavaType = value_class.type_sig().parse()?;
    let signature = signature.to_string();
    let raw_class = class.get(env)?;
    let c_name = JniString::new(name);
    let c_sig = JniString::new(&signature);
    let id = if is_static {
        let lookup = jni_method!(env.as_raw(), GetStaticFieldID);
        unsafe { lookup(env.as_raw(), raw_class, c_name.as_ptr(), c_sig.as_ptr()) }
    } else {
        let lookup = jni_method!(env.as_raw(), GetFieldID);
        unsafe { lookup(env.as_raw(), raw_class, c_name.as_ptr(), c_sig.as_ptr()) }
    };
    if id.is_null() {
        let message = format!(
            "unable to find the field {}.{} of type {}",
            class.binary_name(),
            name,
            signature
        );
        return Err(match bridge::check_and_raise(env) {
            Err(cause) => Error::jni_with(message, cause),
            Ok(()) => Error::jni(message),
        });
    }
    Ok(FieldId { raw: id })
}
