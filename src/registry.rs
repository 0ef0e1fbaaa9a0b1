//! The factory registry driving exception translation.
//!
//! Maps binary class names to factories that rebuild a thrown Java object as
//! a typed native proxy. Registration is a startup concern: register every
//! factory (including [`crate::throwables::register_built_in_throwables`])
//! before threads start invoking into the JVM, after which lookups are
//! read-only and take the lock shared.

use std::collections::HashMap;
use std::sync::RwLock;

use log::debug;
use once_cell::sync::Lazy;

use crate::env::Env;
use crate::errors::{JavaError, Result};
use crate::proxy::Object;

/// Builds a typed proxy from a thrown object. The object is already pinned
/// by a global reference; the factory decides the proxy type and captures
/// whatever state (typically the message) it wants eagerly.
pub type ThrowableFactory = fn(&Env, Object) -> Result<JavaError>;

static REGISTRY: Lazy<RwLock<HashMap<String, ThrowableFactory>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// Registers `factory` for the class with the given binary name, e.g.
/// `"java.util.NoSuchElementException"`. A later registration for the same
/// name replaces the earlier one.
pub fn register(class_name: impl Into<String>, factory: ThrowableFactory) {
    let class_name = class_name.into();
    debug!("registering an exception factory for {class_name}");
    let mut map = REGISTRY.write().unwrap_or_else(|e| e.into_inner());
    map.insert(class_name, factory);
}

/// True if a factory is registered for the given binary class name.
pub fn is_registered(class_name: &str) -> bool {
    let map = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    map.contains_key(class_name)
}

/// Factory for the given binary class name, if registered.
pub(crate) fn lookup(class_name: &str) -> Option<ThrowableFactory> {
    let map = REGISTRY.read().unwrap_or_else(|e| e.into_inner());
    map.get(class_name).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    fn dummy(_env: &Env, _object: Object) -> Result<JavaError> {
        Err(Error::jni("dummy factory"))
    }

    fn other(_env: &Env, _object: Object) -> Result<JavaError> {
        Err(Error::jni("other factory"))
    }

    #[test]
    fn register_and_lookup() {
        register("com.example.First", dummy);
        assert!(is_registered("com.example.First"));
        assert!(lookup("com.example.First").is_some());
        assert!(lookup("com.example.Missing").is_none());
    }

    #[test]
    fn later_registration_replaces_earlier() {
        register("com.example.Replaced", dummy);
        register("com.example.Replaced", other);
        let factory = lookup("com.example.Replaced").unwrap();
        assert_eq!(factory as usize, other as usize);
    }
}
