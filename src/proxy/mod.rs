//! Object, array and field proxies.
//!
//! A proxy pairs a pinned JVM reference with a typed Rust view. Proxies are
//! cheap to clone (the reference is shared) and release their reference when
//! the last clone drops, attaching the releasing thread on demand.

mod array;
mod field;
mod object;
mod string;

pub use array::{ElementProxy, JArray};
pub use field::FieldProxy;
pub use object::{Object, ObjectProxy};
pub use string::JString;

#[doc(hidden)]
pub use object::{new_object_array_raw, object_element_raw, set_object_element_raw};
