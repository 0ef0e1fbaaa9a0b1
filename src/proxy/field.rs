//! A handle binding one field to one object.

use crate::env::Env;
use crate::errors::Result;
use crate::invoke::Field;
use crate::proxy::Object;
use crate::value::FieldValue;

/// A field of a specific object. Reads always reflect the current field
/// value; writes go straight through to the object.
///
/// Holds its own reference to the object, so the handle stays valid after
/// the proxy it was taken from is dropped.
pub struct FieldProxy<T: FieldValue + 'static> {
    object: Object,
    field: &'static Field<T>,
}

impl<T: FieldValue + 'static> FieldProxy<T> {
    /// Binds `field` to `object`.
    pub fn new(object: Object, field: &'static Field<T>) -> Self {
        FieldProxy { object, field }
    }

    /// The bound object.
    pub fn object(&self) -> &Object {
        &self.object
    }

    /// Reads the field.
    pub fn get(&self, env: &Env) -> Result<T> {
        self.field.get(env, &self.object)
    }

    /// Writes the field.
    pub fn set(&self, env: &Env, value: &T) -> Result<()> {
        self.field.set(env, &self.object, value)
    }
}

impl<T: FieldValue + 'static> Clone for FieldProxy<T> {
    fn clone(&self) -> Self {
        FieldProxy {
            object: self.object.clone(),
            field: self.field,
        }
    }
}
