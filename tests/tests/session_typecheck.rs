//! The strict structural check: local shape violations fail before any
//! engine call, semantic scalar checks are the engine's.

use tabula_core::{ArrayValue, Error, NameTypePair, Tuple, Type, Value};
use tabula_session::{EmbeddedSession, EngineGate, Session};
use tabula_tests::MockEngine;

fn point_engine() -> MockEngine {
    let engine = MockEngine::new();
    engine.declare_var(
        "t",
        Type::tuple(vec![
            NameTypePair::new("x", Type::float()),
            NameTypePair::new("y", Type::float()),
        ]),
    );
    engine
}

fn open(engine: &MockEngine) -> EmbeddedSession {
    EmbeddedSession::open_with_gate(Box::new(engine.clone()), EngineGate::private())
        .expect("session must open")
}

#[test]
fn test_missing_attribute_fails_before_the_engine() {
    let engine = point_engine();
    let session = open(&engine);

    let tuple = Tuple::new().with_attribute("x", Value::from(1.0));
    let err = session.set_var("t", Value::Tuple(tuple)).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(engine.bind_calls(), 0);
}

#[test]
fn test_extra_attribute_fails_before_the_engine() {
    let engine = point_engine();
    let session = open(&engine);

    let tuple = Tuple::new()
        .with_attribute("x", Value::from(1.0))
        .with_attribute("y", Value::from(2.0))
        .with_attribute("z", Value::from(3.0));
    let err = session.set_var("t", Value::Tuple(tuple)).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(engine.bind_calls(), 0);
}

#[test]
fn test_renamed_attribute_fails_before_the_engine() {
    let engine = point_engine();
    let session = open(&engine);

    let tuple = Tuple::new()
        .with_attribute("x", Value::from(1.0))
        .with_attribute("why", Value::from(2.0));
    let err = session.set_var("t", Value::Tuple(tuple)).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(engine.bind_calls(), 0);
}

#[test]
fn test_scalar_subtype_mismatch_is_an_engine_error() {
    // Correct shape, wrong scalar subtype: the binding call happens and
    // the engine rejects it with its own semantic error.
    let engine = point_engine();
    let session = open(&engine);

    let tuple = Tuple::new()
        .with_attribute("x", Value::from(1i64))
        .with_attribute("y", Value::from(2.0));
    let err = session.set_var("t", Value::Tuple(tuple)).unwrap_err();

    assert!(matches!(err, Error::Engine { .. }));
    assert_eq!(err.error_type_name().as_deref(), Some("type_error"));
    assert_eq!(engine.bind_calls(), 1);
}

#[test]
fn test_top_level_scalar_subtype_is_also_deferred() {
    let engine = MockEngine::new();
    engine.declare_var("f", Type::float());
    let session = open(&engine);

    let err = session.set_var("f", Value::from(4i64)).unwrap_err();

    assert!(matches!(err, Error::Engine { .. }));
    assert_eq!(err.error_type_name().as_deref(), Some("type_error"));
}

#[test]
fn test_container_for_scalar_fails_before_the_engine() {
    let engine = MockEngine::new();
    engine.declare_var("f", Type::float());
    let session = open(&engine);

    let err = session
        .set_var("f", Value::Tuple(Tuple::new()))
        .unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(engine.bind_calls(), 0);
}

#[test]
fn test_array_element_type_must_match_declaration() {
    let engine = MockEngine::new();
    engine.declare_var("xs", Type::array(Type::float()));
    let session = open(&engine);

    let array = ArrayValue::new(Type::integer(), vec![Value::from(1i64)]);
    let err = session.set_var("xs", Value::Array(array)).unwrap_err();

    assert!(matches!(err, Error::TypeMismatch(_)));
    assert_eq!(engine.bind_calls(), 0);
}

#[test]
fn test_undeclared_variable_is_an_engine_error() {
    let engine = MockEngine::new();
    let session = open(&engine);

    let err = session.set_var("ghost", Value::from(1i64)).unwrap_err();

    assert!(matches!(err, Error::Engine { .. }));
    assert_eq!(engine.bind_calls(), 0);
}
