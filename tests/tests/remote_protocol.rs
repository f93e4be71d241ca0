//! The remote backend against a loopback HTTP responder.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread;
use tabula_core::{Error, Value};
use tabula_session::{RemoteSession, Session};

/// Serves canned JSON bodies by exact request path; anything else is 404.
fn spawn_server(routes: Vec<(&str, &str)>) -> String {
    let routes: HashMap<String, String> = routes
        .into_iter()
        .map(|(path, body)| (path.to_string(), body.to_string()))
        .collect();
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind loopback");
    let addr = listener.local_addr().expect("local addr");

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut chunk) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&chunk[..n]),
                }
            }
            let request = String::from_utf8_lossy(&request);
            let path = request
                .lines()
                .next()
                .and_then(|line| line.split_whitespace().nth(1))
                .unwrap_or("/");

            let response = match routes.get(path) {
                Some(body) => format!(
                    "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{}",
                    body.len(),
                    body
                ),
                None => "HTTP/1.1 404 Not Found\r\nContent-Length: 0\r\n\
                         Connection: close\r\n\r\n"
                    .to_string(),
            };
            let _ = stream.write_all(response.as_bytes());
        }
    });

    format!("http://{}/db", addr)
}

#[test]
fn test_typed_objects_decode_as_possrep_values() {
    let base = spawn_server(vec![("/db/els", r#"[{"@type":"point","x":1,"y":2}]"#)]);
    let session = RemoteSession::connect(&base).unwrap();

    let value = session.evaluate("els").unwrap();
    let array = value.as_array().expect("array expected");
    assert_eq!(array.len(), 1);

    let object = array.get(0).and_then(Value::as_possrep).expect("possrep");
    assert_eq!(object.type_name(), "point");
    // Remote numbers are always floats.
    assert_eq!(object.get_property("x").unwrap(), Value::Float(1.0));
    assert_eq!(object.get_property("y").unwrap(), Value::Float(2.0));
}

#[test]
fn test_plain_objects_decode_as_tuples() {
    let base = spawn_server(vec![("/db/el", r#"{"name":"Oxygen","number":8}"#)]);
    let session = RemoteSession::connect(&base).unwrap();

    let value = session.evaluate("el").unwrap();
    let tuple = value.as_tuple().expect("tuple expected");
    assert_eq!(tuple.attribute("name"), Some(&Value::from("Oxygen")));
    assert_eq!(tuple.attribute("number"), Some(&Value::Float(8.0)));
}

#[test]
fn test_expressions_are_escaped_into_the_path() {
    let base = spawn_server(vec![("/db/sum%281%2C%202%29", "3")]);
    let session = RemoteSession::connect(&base).unwrap();

    assert_eq!(session.evaluate("sum(1, 2)").unwrap(), Value::Float(3.0));
}

#[test]
fn test_http_failure_surfaces_as_an_engine_error() {
    let base = spawn_server(vec![]);
    let session = RemoteSession::connect(&base).unwrap();

    let err = session.evaluate("missing").unwrap_err();
    assert!(matches!(err, Error::Engine { .. }));
    assert!(err.to_string().contains("Not Found"));
}

#[test]
fn test_mutating_operations_are_unsupported() {
    let base = spawn_server(vec![]);
    let session = RemoteSession::connect(&base).unwrap();

    assert!(matches!(
        session.execute("var n int;"),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        session.set_var("n", Value::from(1i64)),
        Err(Error::Unsupported(_))
    ));
    assert!(matches!(
        session.implement_type(
            &tabula_core::ScalarType::new("point", Vec::new()),
            &tabula_typeimpl::HostClass::builder("Point").build(),
        ),
        Err(Error::Unsupported(_))
    ));
}

#[test]
fn test_remote_close_is_terminal() {
    let base = spawn_server(vec![("/db/n", "1")]);
    let session = RemoteSession::connect(&base).unwrap();

    assert_eq!(session.evaluate("n").unwrap(), Value::Float(1.0));
    session.close().unwrap();

    assert!(matches!(session.evaluate("n"), Err(Error::IllegalState(_))));
    assert!(matches!(session.close(), Err(Error::IllegalState(_))));
}

#[test]
fn test_builder_configures_the_endpoint() {
    let err = RemoteSession::builder().connect().unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));

    let base = spawn_server(vec![("/db/n", "1")]);
    let session = RemoteSession::builder()
        .base_url(base)
        .timeout(std::time::Duration::from_secs(5))
        .connect()
        .unwrap();
    assert_eq!(session.evaluate("n").unwrap(), Value::Float(1.0));
}
