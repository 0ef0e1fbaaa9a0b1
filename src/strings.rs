//! String conversion between Rust UTF-8 and the modified UTF-8 that JNI
//! expects for class names, member names, signatures and `java.lang.String`
//! contents.

use std::borrow::Cow;
use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use cesu8::{from_java_cesu8, to_java_cesu8};
use log::debug;

use crate::env::Env;
use crate::errors::{Error, Result};
use crate::sys;

/// An owned null-terminated string in Java's modified UTF-8 encoding,
/// suitable for passing to `FindClass`, `GetMethodID` and friends.
pub struct JniString {
    internal: CString,
}

impl JniString {
    /// Converts a Rust string into the encoding Java expects.
    pub fn new(string: impl AsRef<str>) -> Self {
        let encoded = to_java_cesu8(string.as_ref()).into_owned();
        JniString {
            // to_java_cesu8 never produces interior NULs: U+0000 is encoded
            // as the two-byte sequence 0xC0 0x80.
            internal: unsafe { CString::from_vec_unchecked(encoded) },
        }
    }

    /// Pointer to the null-terminated modified-UTF-8 bytes.
    pub fn as_ptr(&self) -> *const c_char {
        self.internal.as_ptr()
    }

    /// Decodes back to a Rust string.
    pub fn to_str(&self) -> Cow<'_, str> {
        decode_java_bytes(self.internal.to_bytes())
    }
}

impl<T: AsRef<str>> From<T> for JniString {
    fn from(other: T) -> Self {
        JniString::new(other)
    }
}

fn decode_java_bytes(bytes: &[u8]) -> Cow<'_, str> {
    match from_java_cesu8(bytes) {
        Ok(s) => s,
        Err(e) => {
            debug!("error decoding modified UTF-8: {e:#?}");
            String::from_utf8_lossy(bytes)
        }
    }
}

/// Copies the contents of a `java.lang.String` reference into a Rust
/// `String`. The reference is not consumed.
pub fn get_string(env: &Env, string: sys::jstring) -> Result<String> {
    if string.is_null() {
        return Err(Error::NullPtr("get_string string argument"));
    }
    let get_chars = jni_method!(env.as_raw(), GetStringUTFChars);
    let release_chars = jni_method!(env.as_raw(), ReleaseStringUTFChars);

    let chars = unsafe { get_chars(env.as_raw(), string, std::ptr::null_mut()) };
    if chars.is_null() {
        return Err(Error::jni(
            "unable to retrieve the character contents of a Java string",
        ));
    }
    let result = unsafe { decode_java_bytes(CStr::from_ptr(chars).to_bytes()).into_owned() };
    unsafe { release_chars(env.as_raw(), string, chars) };
    Ok(result)
}

/// Creates a new `java.lang.String` local reference from a Rust string.
pub fn new_string(env: &Env, string: impl AsRef<str>) -> Result<sys::jstring> {
    let encoded = JniString::new(string);
    let new_string_utf = jni_method!(env.as_raw(), NewStringUTF);
    let raw = unsafe { new_string_utf(env.as_raw(), encoded.as_ptr()) };
    Ok(non_null!(raw, "NewStringUTF result"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_plain_ascii() {
        let s = JniString::new("java/lang/Object");
        assert_eq!(s.to_str(), "java/lang/Object");
    }

    #[test]
    fn encodes_supplementary_characters_as_surrogate_pairs() {
        // U+1F600 is outside the BMP; modified UTF-8 encodes each surrogate
        // half separately, six bytes in total.
        let s = JniString::new("\u{1F600}");
        assert_eq!(s.internal.to_bytes().len(), 6);
        assert_eq!(s.to_str(), "\u{1F600}");
    }

    #[test]
    fn nul_characters_do_not_truncate() {
        let s = JniString::new("a\0b");
        assert_eq!(s.to_str(), "a\0b");
    }
}
