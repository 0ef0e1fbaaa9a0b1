//! Typed proxy for `java.lang.String`.

use crate::bridge;
use crate::env::Env;
use crate::errors::Result;
use crate::proxy::ObjectProxy;
use crate::strings;

crate::java_proxy!(
    /// A pinned `java.lang.String`, convertible to and from Rust strings.
    pub struct JString,
    "java/lang/String",
    "Ljava/lang/String;"
);

impl JString {
    /// Creates a Java string with the given contents.
    pub fn from_rust(env: &Env, string: impl AsRef<str>) -> Result<Self> {
        let local = strings::new_string(env, string)?;
        bridge::check_and_raise(env)?;
        let object = crate::proxy::Object::from_owned_local(env, local)?;
        Ok(Self::from_object(object))
    }

    /// Copies the contents into a Rust `String`.
    pub fn to_rust(&self, env: &Env) -> Result<String> {
        let raw = non_null!(self.as_object().as_raw(), "JString::to_rust receiver");
        strings::get_string(env, raw)
    }
}
