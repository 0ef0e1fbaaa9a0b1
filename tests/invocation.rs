#![cfg(feature = "invocation")]

mod util;

use assert_matches::assert_matches;

use jproxy::class::ClassDesc;
use jproxy::invoke::{Constructor, Field, Method, StaticField, StaticMethod};
use jproxy::java_proxy;
use jproxy::throwables::ArrayIndexOutOfBoundsException;
use jproxy::types::{JInt, JLong, JVoid};
use jproxy::vm;
use jproxy::{Args, Error, FieldProxy, JArray, JString, Object, ObjectProxy, WeakRef};

static MATH_CLASS: ClassDesc = ClassDesc::new("java/lang/Math", "Ljava/lang/Math;");
static MATH_ABS: StaticMethod<JInt> = StaticMethod::new(&MATH_CLASS, "abs");

static INTEGER_CLASS: ClassDesc = ClassDesc::new("java/lang/Integer", "Ljava/lang/Integer;");
static INTEGER_MAX_VALUE: StaticField<JInt> = StaticField::new(&INTEGER_CLASS, "MAX_VALUE");

static RANDOM_CLASS: ClassDesc = ClassDesc::new("java/util/Random", "Ljava/util/Random;");
static RANDOM_NEW: Constructor<Random> = Constructor::new();
static RANDOM_NEXT_INT: Method<JInt> = Method::new(&RANDOM_CLASS, "nextInt");

static POINT_CLASS: ClassDesc = ClassDesc::new("java/awt/Point", "Ljava/awt/Point;");
static POINT_NEW: Constructor<Point> = Constructor::new();
static POINT_X: Field<JInt> = Field::new(&POINT_CLASS, "x");

static SYSTEM_CLASS: ClassDesc = ClassDesc::new("java/lang/System", "Ljava/lang/System;");
static SYSTEM_GC: StaticMethod<JVoid> = StaticMethod::new(&SYSTEM_CLASS, "gc");

static THREAD_CLASS: ClassDesc = ClassDesc::new("java/lang/Thread", "Ljava/lang/Thread;");
static CURRENT_THREAD: StaticMethod<JavaThread> = StaticMethod::new(&THREAD_CLASS, "currentThread");
static GET_THREAD_GROUP: Method<JavaThreadGroup> = Method::new(&THREAD_CLASS, "getThreadGroup");

static THREAD_GROUP_CLASS: ClassDesc =
    ClassDesc::new("java/lang/ThreadGroup", "Ljava/lang/ThreadGroup;");
static THREAD_GROUP_NEW: Constructor<JavaThreadGroup> = Constructor::new();
static THREAD_GROUP_GET_NAME: Method<JString> = Method::new(&THREAD_GROUP_CLASS, "getName");

java_proxy!(
    /// `java.util.Random`.
    pub struct Random,
    "java/util/Random",
    "Ljava/util/Random;"
);

java_proxy!(
    /// `java.awt.Point`, used for its public instance fields.
    pub struct Point,
    "java/awt/Point",
    "Ljava/awt/Point;"
);

java_proxy!(
    /// `java.lang.Thread`.
    pub struct JavaThread,
    "java/lang/Thread",
    "Ljava/lang/Thread;"
);

java_proxy!(
    /// `java.lang.ThreadGroup`.
    pub struct JavaThreadGroup,
    "java/lang/ThreadGroup",
    "Ljava/lang/ThreadGroup;"
);

#[test]
fn static_method_invocation_reuses_the_cached_id() {
    let env = util::attach();
    let arg = JInt(-42);
    assert_eq!(MATH_ABS.call(&env, &jproxy::args![&arg]).unwrap().0, 42);
    // second call goes through the cached method ID
    let arg = JInt(-7);
    assert_eq!(MATH_ABS.call(&env, &jproxy::args![&arg]).unwrap().0, 7);
}

#[test]
fn constructor_and_instance_method() {
    let env = util::attach();
    let seed = JLong(42);
    let first = RANDOM_NEW.new_instance(&env, &Args::new().arg(&seed)).unwrap();
    let second = RANDOM_NEW.new_instance(&env, &Args::new().arg(&seed)).unwrap();
    // Random's generator is fully specified, so equal seeds agree
    let a = RANDOM_NEXT_INT.call(&env, first.as_object(), &Args::new()).unwrap();
    let b = RANDOM_NEXT_INT.call(&env, second.as_object(), &Args::new()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn instance_fields_write_through() {
    let env = util::attach();
    let (x, y) = (JInt(3), JInt(4));
    let point = POINT_NEW
        .new_instance(&env, &Args::new().arg(&x).arg(&y))
        .unwrap();
    assert_eq!(POINT_X.get(&env, point.as_object()).unwrap().0, 3);

    let proxy = FieldProxy::new(point.as_object().clone(), &POINT_X);
    proxy.set(&env, &JInt(9)).unwrap();
    assert_eq!(proxy.get(&env).unwrap().0, 9);
    // the write went to the object, not a native copy
    assert_eq!(POINT_X.get(&env, point.as_object()).unwrap().0, 9);
}

#[test]
fn static_fields_are_readable() {
    let env = util::attach();
    assert_eq!(INTEGER_MAX_VALUE.get(&env).unwrap().0, i32::MAX);
}

#[test]
fn primitive_arrays_get_and_set() {
    let env = util::attach();
    let array = JArray::<JInt>::new(&env, 5).unwrap();
    assert_eq!(array.len(&env).unwrap(), 5);
    assert_eq!(array.get(&env, 2).unwrap().0, 0);

    array.set(&env, 2, &JInt(7)).unwrap();
    assert_eq!(array.get(&env, 2).unwrap().0, 7);

    let slot = array.at(4);
    slot.set(&env, &JInt(-1)).unwrap();
    assert_eq!(slot.get(&env).unwrap().0, -1);
}

#[test]
fn out_of_bounds_access_translates() {
    let env = util::attach();
    let array = JArray::<JInt>::new(&env, 1).unwrap();
    let err = array.get(&env, 99).unwrap_err();
    match err {
        Error::Java(java) => {
            assert!(java.is::<ArrayIndexOutOfBoundsException>());
            assert_eq!(java.class_name(), "java.lang.ArrayIndexOutOfBoundsException");
        }
        other => panic!("expected a translated exception, got {other}"),
    }
}

#[test]
fn object_arrays_hold_proxies() {
    let env = util::attach();
    let array = JArray::<JString>::new(&env, 2).unwrap();
    assert!(array.get(&env, 0).unwrap().as_object().is_null());

    let hello = JString::from_rust(&env, "hello").unwrap();
    array.set(&env, 1, &hello).unwrap();
    assert_eq!(array.get(&env, 1).unwrap().to_rust(&env).unwrap(), "hello");
}

#[test]
fn strings_round_trip_through_the_jvm() {
    let env = util::attach();
    let text = "grüße \u{1F600}";
    let js = JString::from_rust(&env, text).unwrap();
    assert_eq!(js.to_rust(&env).unwrap(), text);
}

#[test]
fn rebinding_an_object_handle_leaves_clones_alone() {
    let env = util::attach();
    let first = JString::from_rust(&env, "first").unwrap();
    let second = JString::from_rust(&env, "second").unwrap();

    let mut handle = first.as_object().clone();
    handle.set_raw(&env, second.as_object().as_raw()).unwrap();
    let rebound = JString::from_object(handle);
    assert_eq!(rebound.to_rust(&env).unwrap(), "second");
    // the clone this handle was taken from still sees the old referent
    assert_eq!(first.to_rust(&env).unwrap(), "first");
}

#[test]
fn weak_references_upgrade_while_strongly_held() {
    let env = util::attach();
    let strong = JString::from_rust(&env, "pinned").unwrap();
    let weak = WeakRef::new(&env, strong.as_object()).unwrap();
    let upgraded = weak.upgrade(&env).unwrap().expect("referent is pinned");
    assert!(!upgraded.is_null());
}

#[test]
fn null_receivers_fail_fast() {
    let env = util::attach();
    let null = Object::null();
    let arg = JInt(0);
    assert_matches!(
        RANDOM_NEXT_INT.call(&env, &null, &Args::new()),
        Err(Error::NullPtr(_))
    );
    assert_matches!(POINT_X.get(&env, &null), Err(Error::NullPtr(_)));
    assert_matches!(POINT_X.set(&env, &null, &arg), Err(Error::NullPtr(_)));
    // the guard fired before any JNI call, so nothing is pending
    assert!(!env.exception_check().unwrap());
}

#[test]
fn attach_honors_the_requested_thread_group() {
    let env = util::attach();
    let name = JString::from_rust(&env, "jproxy-workers").unwrap();
    let group = THREAD_GROUP_NEW
        .new_instance(&env, &jproxy::args![&name])
        .unwrap();

    let group_object = group.as_object().clone();
    let worker = std::thread::spawn(move || {
        let config = vm::AttachConfig::new().name("grouped").group(group_object);
        let env = vm::attach_with(&config).unwrap();
        let thread = CURRENT_THREAD.call(&env, &Args::new()).unwrap();
        let group = GET_THREAD_GROUP
            .call(&env, thread.as_object(), &Args::new())
            .unwrap();
        THREAD_GROUP_GET_NAME
            .call(&env, group.as_object(), &Args::new())
            .unwrap()
            .to_rust(&env)
            .unwrap()
    });
    assert_eq!(worker.join().unwrap(), "jproxy-workers");
}

#[test]
fn releasing_the_last_clone_unpins_the_referent() {
    let env = util::attach();
    let strong = JString::from_rust(&env, "transient").unwrap();
    let clone = strong.clone();
    let weak = WeakRef::new(&env, strong.as_object()).unwrap();

    // one of two clones dropped: the referent stays pinned
    drop(strong);
    assert!(weak.upgrade(&env).unwrap().is_some());

    drop(clone);
    let mut collected = false;
    for _ in 0..50 {
        SYSTEM_GC.call(&env, &Args::new()).unwrap();
        if weak.upgrade(&env).unwrap().is_none() {
            collected = true;
            break;
        }
        std::thread::sleep(std::time::Duration::from_millis(10));
    }
    assert!(
        collected,
        "the referent stayed reachable after its last strong clone dropped"
    );
}

#[test]
fn missing_members_chain_the_java_cause() {
    let env = util::attach();
    static MISSING: StaticMethod<JInt> = StaticMethod::new(&MATH_CLASS, "noSuchMethod");
    let arg = JInt(1);
    let err = MISSING.call(&env, &Args::new().arg(&arg)).unwrap_err();
    assert_matches!(err, Error::Jni { source: Some(_), .. });

    static BOGUS: ClassDesc = ClassDesc::new("no/such/Klass", "Lno/such/Klass;");
    assert_matches!(BOGUS.get(&env), Err(Error::Jni { .. }));
}
