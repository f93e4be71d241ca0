//! The remote backend: read-only evaluation over HTTP+JSON.

use crate::session::{Materialized, Session};
use log::debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tabula_core::{ArrayValue, Error, NativePossrep, Result, ScalarType, Tuple, Value};
use tabula_engine::HostObject;
use tabula_typeimpl::HostClass;

/// Reserved JSON field marking an object as a possrep-typed payload.
const TYPE_FIELD: &str = "@type";

/// Builder for [`RemoteSession`]: base endpoint plus transport settings.
#[derive(Default)]
pub struct RemoteSessionBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl RemoteSessionBuilder {
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overall per-request timeout. Timeout policy belongs to the
    /// transport; the session layer itself never cancels a call.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connect(self) -> Result<RemoteSession> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::configuration("remote session requires a base URL"))?;
        let mut agent = ureq::AgentBuilder::new();
        if let Some(timeout) = self.timeout {
            agent = agent.timeout(timeout);
        }
        Ok(RemoteSession {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: agent.build(),
            closed: AtomicBool::new(false),
        })
    }
}

/// A read-only session against a remote evaluation endpoint.
///
/// Stateless besides the base endpoint: every call is an independent
/// request/response, so concurrent use needs no locking. Mutating
/// operations fail with `Unsupported` by design.
#[derive(Debug)]
pub struct RemoteSession {
    base_url: String,
    agent: ureq::Agent,
    closed: AtomicBool,
}

impl RemoteSession {
    pub fn builder() -> RemoteSessionBuilder {
        RemoteSessionBuilder::default()
    }

    /// Connects with default transport settings.
    pub fn connect(url: &str) -> Result<Self> {
        Self::builder().base_url(url).connect()
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::SeqCst) {
            Err(Error::illegal_state("session is closed"))
        } else {
            Ok(())
        }
    }

    fn unsupported(&self, what: &str) -> Error {
        Error::unsupported(format!("{} on a remote session", what))
    }
}

impl Session for RemoteSession {
    fn execute(&self, _code: &str) -> Result<()> {
        self.ensure_open()?;
        Err(self.unsupported("execute"))
    }

    fn evaluate(&self, expr: &str) -> Result<Value> {
        self.ensure_open()?;
        let url = format!("{}/{}", self.base_url, escape_path(expr));
        debug!("GET {}", url);
        let response = self.agent.get(&url).call().map_err(|err| match err {
            // Non-2xx surfaces as an engine-shaped error carrying the
            // status reason, so callers need no backend-specific branch.
            ureq::Error::Status(_code, response) => {
                Error::engine(response.status_text().to_string())
            }
            other => Error::engine(other.to_string()),
        })?;
        let body = response
            .into_string()
            .map_err(|err| Error::engine(format!("reading response body failed: {}", err)))?;
        let json: serde_json::Value = serde_json::from_str(&body)
            .map_err(|err| Error::engine(format!("invalid JSON response: {}", err)))?;
        Ok(decode_json(json))
    }

    fn evaluate_into(
        &self,
        _expr: &str,
        _class: &HostClass,
        _instance: &mut HostObject,
    ) -> Result<()> {
        self.ensure_open()?;
        Err(self.unsupported("evaluate_into"))
    }

    fn evaluate_as(&self, _expr: &str, _class: &HostClass) -> Result<Materialized> {
        self.ensure_open()?;
        Err(self.unsupported("evaluate_as"))
    }

    fn set_var(&self, _name: &str, _value: Value) -> Result<()> {
        self.ensure_open()?;
        Err(self.unsupported("set_var"))
    }

    fn implement_type(&self, _ty: &ScalarType, _class: &HostClass) -> Result<()> {
        self.ensure_open()?;
        Err(self.unsupported("implement_type"))
    }

    fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::SeqCst) {
            return Err(Error::illegal_state("session is already closed"));
        }
        debug!("remote session closed");
        Ok(())
    }
}

/// Decodes a JSON document per the remote protocol.
///
/// Arrays decode element-wise into untyped host arrays; an object with a
/// `@type` string field becomes a host-native possrep value with one
/// property per remaining field; any other object becomes a tuple; numbers
/// are always floats, JSON having no distinct integer representation.
pub fn decode_json(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Boolean(b),
        serde_json::Value::Number(n) => Value::Float(n.as_f64().unwrap_or_default()),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            Value::Array(ArrayValue::untyped(items.into_iter().map(decode_json).collect()))
        }
        serde_json::Value::Object(mut fields) => match fields.remove(TYPE_FIELD) {
            Some(serde_json::Value::String(type_name)) => {
                let mut object = NativePossrep::new(type_name);
                for (name, item) in fields {
                    object = object.with_property(name, decode_json(item));
                }
                Value::Possrep(Arc::new(object))
            }
            Some(other) => {
                // A non-string marker is not the possrep convention; keep
                // the field and decode as a plain tuple.
                fields.insert(TYPE_FIELD.to_string(), other);
                decode_tuple(fields)
            }
            None => decode_tuple(fields),
        },
    }
}

fn decode_tuple(fields: serde_json::Map<String, serde_json::Value>) -> Value {
    let mut tuple = Tuple::new();
    for (name, item) in fields {
        // Attribute names are non-empty; an empty key cannot name one.
        if name.is_empty() {
            continue;
        }
        tuple.set_attribute(name, decode_json(item));
    }
    Value::Tuple(tuple)
}

/// Percent-escapes an expression for use as one URL path segment.
fn escape_path(expr: &str) -> String {
    let mut out = String::with_capacity(expr.len());
    for byte in expr.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => {
                out.push('%');
                out.push_str(&format!("{:02X}", byte));
            }
        }
    }
    out
}
