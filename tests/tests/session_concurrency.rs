//! Process-wide serialization of embedded engine access.
//!
//! The mock engine panics if it is ever re-entered, so these tests fail
//! loudly if the gate stops serializing calls.

use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tabula_session::{EmbeddedSession, EngineGate, Session};
use tabula_tests::MockEngine;

#[test]
fn test_concurrent_executes_on_one_session_serialize() {
    // GIVEN a session whose engine holds each statement for a while
    let engine = MockEngine::new().with_delay(Duration::from_millis(25));
    let session = Arc::new(
        EmbeddedSession::open_with_gate(Box::new(engine.clone()), EngineGate::private())
            .expect("session must open"),
    );

    // WHEN two threads execute concurrently
    let handles: Vec<_> = (0..2)
        .map(|i| {
            let session = Arc::clone(&session);
            thread::spawn(move || session.execute(&format!("insert t {};", i)))
        })
        .collect();
    for handle in handles {
        handle.join().expect("thread must not panic").unwrap();
    }

    // THEN both statements ran, in some total order
    let mut executed = engine.executed();
    executed.sort();
    assert_eq!(executed, ["insert t 0;", "insert t 1;"]);
}

#[test]
fn test_sessions_sharing_a_gate_serialize_against_each_other() {
    // GIVEN two sessions over the same engine state, sharing one gate
    let engine = MockEngine::new().with_delay(Duration::from_millis(25));
    let gate = EngineGate::private();
    let first = Arc::new(
        EmbeddedSession::open_with_gate(Box::new(engine.clone()), gate.clone())
            .expect("session must open"),
    );
    let second = Arc::new(
        EmbeddedSession::open_with_gate(Box::new(engine.clone()), gate)
            .expect("session must open"),
    );

    // WHEN both are driven from different threads
    let threads = [
        thread::spawn({
            let session = Arc::clone(&first);
            move || session.execute("from first;")
        }),
        thread::spawn({
            let session = Arc::clone(&second);
            move || session.execute("from second;")
        }),
    ];
    for handle in threads {
        handle.join().expect("thread must not panic").unwrap();
    }

    // THEN the engine never saw interleaved calls
    assert_eq!(engine.executed().len(), 2);
}

#[test]
fn test_global_gate_is_one_per_process() {
    // Sessions opened through the default constructor share the process
    // gate; this is just the cheap sanity check that both open and close.
    let engine = MockEngine::new();
    let session = tabula_session::create_session(Box::new(engine.clone())).unwrap();
    let other = tabula_session::create_session(Box::new(engine.clone())).unwrap();

    session.close().unwrap();
    other.close().unwrap();
}
