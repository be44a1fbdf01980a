//! Thread-scoped facade tests
//!
//! Each test starts with `discard_capture()` so that nothing left pending on
//! the test thread leaks between tests.

mod common;

use std::sync::Arc;
use std::thread;

use common::Fixtures;
use functo_core::{ClassId, Value};
use functo_engine::{
    calls_to, capture_phase, command_for, configure, consume_capture, discard_capture,
    filter_for, function_for, predicate_for, predicate_for_or, prepare_void, runnable_for,
    void_command, void_command_as, with_session, CaptureSession, FunctionalShape, Mode,
    SessionOptions, SlotPhase,
};
use parking_lot::Mutex;

#[test]
fn test_prepare_then_void_command() {
    discard_capture();
    let fx = Fixtures::new();
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();

    prepare_void(&calls_to_grows).unwrap().call("inc", &[]).unwrap();
    let inc = void_command().unwrap();

    let mut grows = fx.new_grows();
    inc.execute(&mut grows).unwrap();
    assert_eq!(grows.get_as::<i32>("i").unwrap(), 1);
    assert_eq!(capture_phase(), SlotPhase::Empty);
}

#[test]
fn test_type_validation_then_retry() {
    discard_capture();
    let fx = Fixtures::new();
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();

    prepare_void(&calls_to_grows).unwrap().call("inc", &[]).unwrap();
    let err = void_command_as(ClassId::NUMBER).unwrap_err();
    assert!(err.to_string().contains("Failed to create command"));
    assert!(void_command_as(fx.grows).is_ok());
}

#[test]
fn test_prepare_without_call() {
    discard_capture();
    let fx = Fixtures::new();
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();

    prepare_void(&calls_to_grows).unwrap();
    let err = void_command().unwrap_err();
    assert!(err.to_string().contains("No call to a"));

    prepare_void(&calls_to_grows).unwrap();
    assert_eq!(discard_capture(), SlotPhase::Prepared);
}

#[test]
fn test_value_shapes() {
    discard_capture();
    let fx = Fixtures::new();
    let person = calls_to(&fx.registry, fx.person).unwrap();

    let name = function_for(person.call("getName", &[]).unwrap()).unwrap();
    let adult = predicate_for(person.call("isAdult", &[]).unwrap()).unwrap();
    let active = predicate_for_or(person.call("isActive", &[]).unwrap(), false).unwrap();
    let adults = filter_for(person.call("isAdult", &[]).unwrap()).unwrap();
    let age = consume_capture_for_age(&person);

    let mut tim = fx.new_person("Tim", 12);
    assert_eq!(name.apply(&mut tim).unwrap(), Value::str("Tim"));
    assert!(!adult.test(&mut tim).unwrap());
    assert!(!active.test(&mut tim).unwrap());
    assert!(!adults.accept(&mut tim).unwrap());
    assert_eq!(age.apply(&mut tim).unwrap(), Value::i32(12));
}

fn consume_capture_for_age(person: &functo_engine::StandIn) -> functo_engine::FunctionalValue {
    person.call("getAge", &[]).unwrap();
    consume_capture(Mode::function(), FunctionalShape::UnaryFunction, None).unwrap()
}

#[test]
fn test_command_and_runnable() {
    discard_capture();
    let fx = Fixtures::new();
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();

    let inc = command_for(calls_to_grows.call("incAndReturn", &[]).unwrap()).unwrap();
    let target = Arc::new(Mutex::new(fx.new_grows()));
    let dec = runnable_for(target.clone(), Value::Null);
    assert!(dec.is_err());

    calls_to_grows.call("dec", &[]).unwrap();
    let dec = runnable_for(target.clone(), Value::Void).unwrap();

    inc.execute(&mut target.lock()).unwrap();
    inc.execute(&mut target.lock()).unwrap();
    dec.run().unwrap();
    assert_eq!(target.lock().get_as::<i32>("i").unwrap(), 1);
}

#[test]
fn test_strict_options_per_thread() {
    discard_capture();
    let fx = Fixtures::new();

    let registry = fx.registry.clone();
    let grows = fx.grows;
    let strict = thread::spawn(move || {
        configure(SessionOptions::strict());
        let calls_to_grows = calls_to(&registry, grows).unwrap();
        calls_to_grows.call("inc", &[]).unwrap();
        void_command().is_err()
    })
    .join()
    .unwrap();
    assert!(strict);

    // this thread keeps the default options
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();
    calls_to_grows.call("inc", &[]).unwrap();
    assert!(void_command().is_ok());
}

#[test]
fn test_explicit_session_stand_in_is_foreign() {
    discard_capture();
    let fx = Fixtures::new();
    let explicit = CaptureSession::new();
    let stand_in = explicit.stand_in(&fx.registry, fx.grows).unwrap();

    let err = prepare_void(&stand_in).unwrap_err();
    assert!(matches!(err, functo_engine::FunctoError::ForeignStandIn { .. }));
    assert!(with_session(|s| s.phase() == SlotPhase::Empty));
}

#[test]
fn test_threads_do_not_share_slots() {
    discard_capture();
    let fx = Arc::new(Fixtures::new());
    let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();
    prepare_void(&calls_to_grows).unwrap();

    let worker = {
        let fx = fx.clone();
        thread::spawn(move || {
            let calls_to_grows = calls_to(&fx.registry, fx.grows).unwrap();
            prepare_void(&calls_to_grows).unwrap().call("dec", &[]).unwrap();
            void_command().unwrap()
        })
    };
    let dec = worker.join().unwrap();

    calls_to_grows.call("inc", &[]).unwrap();
    let inc = void_command().unwrap();

    let mut grows = fx.new_grows();
    inc.execute(&mut grows).unwrap();
    inc.execute(&mut grows).unwrap();
    dec.execute(&mut grows).unwrap();
    assert_eq!(grows.get_as::<i32>("i").unwrap(), 1);
}
