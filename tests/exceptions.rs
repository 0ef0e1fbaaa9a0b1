#![cfg(feature = "invocation")]

use assert_matches::assert_matches;

use jproxy::bridge;
use jproxy::class::ClassDesc;
use jproxy::invoke::{Method, StaticMethod};
use jproxy::java_proxy;
use jproxy::throwables::{
    register_built_in_throwables, NumberFormatException, RuntimeException, UnknownThrowable,
};
use jproxy::types::JInt;
use jproxy::vm::{self, VmOptions};
use jproxy::{Args, Env, Error, JString, Object, ObjectProxy, Result};

static INTEGER_CLASS: ClassDesc = ClassDesc::new("java/lang/Integer", "Ljava/lang/Integer;");
static PARSE_INT: StaticMethod<JInt> = StaticMethod::new(&INTEGER_CLASS, "parseInt");

static COLLECTIONS_CLASS: ClassDesc =
    ClassDesc::new("java/util/Collections", "Ljava/util/Collections;");
static EMPTY_ITERATOR: StaticMethod<JavaIterator> =
    StaticMethod::new(&COLLECTIONS_CLASS, "emptyIterator");

static ITERATOR_CLASS: ClassDesc = ClassDesc::new("java/util/Iterator", "Ljava/util/Iterator;");
static ITERATOR_NEXT: Method<Object> = Method::new(&ITERATOR_CLASS, "next");

java_proxy!(
    /// `java.util.Iterator`.
    pub struct JavaIterator,
    "java/util/Iterator",
    "Ljava/util/Iterator;"
);

fn parse(env: &Env, text: &str) -> Result<JInt> {
    let input = JString::from_rust(env, text)?;
    PARSE_INT.call(env, &Args::new().arg(&input))
}

// Registration order matters, so the whole scenario runs as one test: first
// with an empty registry, then with the built-in factories installed.
#[test]
fn translation_before_and_after_registration() {
    vm::create_vm(&VmOptions::new()).unwrap();
    let env = vm::attach().unwrap();

    // Nothing registered yet: generic capture keeps the runtime class name.
    let err = parse(&env, "bogus").unwrap_err();
    match err {
        Error::Java(java) => {
            assert!(java.is::<UnknownThrowable>());
            assert_eq!(java.class_name(), "java.lang.NumberFormatException");
            let unknown = java.downcast_ref::<UnknownThrowable>().unwrap();
            assert!(unknown.message().unwrap().contains("bogus"));
        }
        other => panic!("expected a translated exception, got {other}"),
    }
    // the walk resolved its bootstrap classes and IDs without leaving
    // anything pending behind it
    assert!(!env.exception_check().unwrap());

    register_built_in_throwables();

    // The exact class is registered now, so the walk stops at the first step.
    let err = parse(&env, "still bogus").unwrap_err();
    match err {
        Error::Java(java) => {
            assert!(java.is::<NumberFormatException>());
            assert!(!java.is::<RuntimeException>());
            assert_eq!(java.class_name(), "java.lang.NumberFormatException");
            let nfe = java.downcast_ref::<NumberFormatException>().unwrap();
            assert!(nfe.message().unwrap().contains("still bogus"));
        }
        other => panic!("expected a translated exception, got {other}"),
    }

    // java.util.NoSuchElementException is not a built-in; the walk climbs to
    // its nearest registered ancestor, java.lang.RuntimeException.
    let iterator = EMPTY_ITERATOR.call(&env, &Args::new()).unwrap();
    let err = ITERATOR_NEXT
        .call(&env, iterator.as_object(), &Args::new())
        .unwrap_err();
    let java = match err {
        Error::Java(java) => {
            assert!(java.is::<RuntimeException>());
            assert_eq!(java.class_name(), "java.lang.RuntimeException");
            java
        }
        other => panic!("expected a translated exception, got {other}"),
    };

    // Raise the translated error back into the JVM and translate it again.
    env.throw(&Error::Java(java)).unwrap();
    let err = bridge::check_and_raise(&env).unwrap_err();
    assert_matches!(err, Error::Java(ref java) if java.is::<RuntimeException>());

    // A failed class lookup chains the pending Java cause under the error.
    static BOGUS: ClassDesc = ClassDesc::new("no/such/Klass", "Lno/such/Klass;");
    let err = BOGUS.get(&env).unwrap_err();
    assert_matches!(err, Error::Jni { source: Some(_), .. });
}
