//! Startup options for a virtual machine created in-process.

use std::os::raw::c_void;

use crate::strings::JniString;
use crate::sys;

/// Categories accepted by the JVM's `-verbose:` switch.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Verbose {
    Class,
    Gc,
    Jni,
}

impl Verbose {
    fn as_option(self) -> &'static str {
        match self {
            Verbose::Class => "-verbose:class",
            Verbose::Gc => "-verbose:gc",
            Verbose::Jni => "-verbose:jni",
        }
    }
}

/// Builder for the option list handed to `JNI_CreateJavaVM`.
///
/// ```ignore
/// let options = VmOptions::new()
///     .classpath("build/classes")
///     .option("-Xmx64m")
///     .verbose(Verbose::Jni);
/// vm::create_vm(&options)?;
/// ```
#[derive(Debug, Default)]
pub struct VmOptions {
    version: Option<sys::jint>,
    options: Vec<String>,
    ignore_unrecognized: bool,
}

impl VmOptions {
    /// Defaults: JNI 1.8, no options, unrecognized options rejected.
    pub fn new() -> Self {
        VmOptions::default()
    }

    /// Requests a specific JNI interface version.
    pub fn version(mut self, version: sys::jint) -> Self {
        self.version = Some(version);
        self
    }

    /// Appends a raw JVM option string, e.g. `"-Xcheck:jni"`.
    pub fn option(mut self, option: impl Into<String>) -> Self {
        self.options.push(option.into());
        self
    }

    /// Sets the class path (`-Djava.class.path=`).
    pub fn classpath(self, classpath: impl AsRef<str>) -> Self {
        self.option(format!("-Djava.class.path={}", classpath.as_ref()))
    }

    /// Sets the native library path (`-Djava.library.path=`).
    pub fn library_path(self, path: impl AsRef<str>) -> Self {
        self.option(format!("-Djava.library.path={}", path.as_ref()))
    }

    /// Enables one `-verbose:` category.
    pub fn verbose(self, category: Verbose) -> Self {
        self.option(category.as_option())
    }

    /// Asks the JVM to skip options it does not recognize instead of
    /// failing creation.
    pub fn ignore_unrecognized(mut self, ignore: bool) -> Self {
        self.ignore_unrecognized = ignore;
        self
    }

    /// Lowers the builder to raw init args. The returned strings own the
    /// option text; keep them alive until `JNI_CreateJavaVM` returns.
    pub(crate) fn build_args(&self) -> (sys::JavaVMInitArgs, Vec<JniString>, Vec<sys::JavaVMOption>) {
        let strings: Vec<JniString> = self.options.iter().map(JniString::new).collect();
        let mut raw_options: Vec<sys::JavaVMOption> = strings
            .iter()
            .map(|s| sys::JavaVMOption {
                optionString: s.as_ptr() as *mut _,
                extraInfo: std::ptr::null_mut() as *mut c_void,
            })
            .collect();
        let args = sys::JavaVMInitArgs {
            version: self.version.unwrap_or(sys::JNI_VERSION_1_8),
            nOptions: raw_options.len() as sys::jint,
            options: raw_options.as_mut_ptr(),
            ignoreUnrecognized: if self.ignore_unrecognized {
                sys::JNI_TRUE
            } else {
                sys::JNI_FALSE
            },
        };
        (args, strings, raw_options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_option_strings() {
        let options = VmOptions::new()
            .classpath("classes:lib/dep.jar")
            .verbose(Verbose::Gc)
            .option("-Xmx64m");
        assert_eq!(
            options.options,
            vec![
                "-Djava.class.path=classes:lib/dep.jar",
                "-verbose:gc",
                "-Xmx64m",
            ]
        );
    }

    #[test]
    fn raw_args_mirror_the_builder() {
        let options = VmOptions::new()
            .version(sys::JNI_VERSION_1_6)
            .option("-Xcheck:jni")
            .ignore_unrecognized(true);
        let (args, _strings, raw) = options.build_args();
        assert_eq!(args.version, sys::JNI_VERSION_1_6);
        assert_eq!(args.nOptions, 1);
        assert_eq!(args.ignoreUnrecognized, sys::JNI_TRUE);
        assert_eq!(raw.len(), 1);
    }

    #[test]
    fn defaults_to_jni_1_8() {
        let (args, _strings, _raw) = VmOptions::new().build_args();
        assert_eq!(args.version, sys::JNI_VERSION_1_8);
        assert_eq!(args.nOptions, 0);
        assert_eq!(args.ignoreUnrecognized, sys::JNI_FALSE);
    }
}
