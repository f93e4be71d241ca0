//! The error taxonomy shared across the workspace.

use crate::Value;
use thiserror::Error;

/// Errors surfaced by the client runtime.
#[derive(Debug, Error)]
pub enum Error {
    /// The engine rejected a statement or expression. Carries the
    /// engine-produced error value when one is available; for possrep-typed
    /// error values the message names the error type and its `msg`
    /// property.
    #[error("engine error: {message}")]
    Engine {
        message: String,
        value: Option<Value>,
    },

    /// A host value's shape does not match the declared engine type.
    /// Raised before any engine call is attempted, so no partial engine
    /// effect can occur.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// Type-implementation preconditions unmet: missing constructor, or a
    /// missing/mismatched getter or setter.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The operation is not meaningful for the current backend, or a proxy
    /// method does not follow the property naming convention.
    #[error("unsupported operation: {0}")]
    Unsupported(String),

    /// The operation was attempted on a closed session or a dead handle.
    #[error("illegal state: {0}")]
    IllegalState(String),
}

/// Result type for client runtime operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn engine(message: impl Into<String>) -> Self {
        Error::Engine {
            message: message.into(),
            value: None,
        }
    }

    /// Builds an engine error from an engine-produced error value. For a
    /// possrep-typed value the message is `<type name>: <msg property>`;
    /// a failure reading `msg` is ignored.
    pub fn engine_value(value: Value) -> Self {
        let message = describe_error_value(&value);
        Error::Engine {
            message,
            value: Some(value),
        }
    }

    pub fn type_mismatch(message: impl Into<String>) -> Self {
        Error::TypeMismatch(message.into())
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration(message.into())
    }

    pub fn unsupported(message: impl Into<String>) -> Self {
        Error::Unsupported(message.into())
    }

    pub fn illegal_state(message: impl Into<String>) -> Self {
        Error::IllegalState(message.into())
    }

    /// The engine-produced error value, if any.
    pub fn error_value(&self) -> Option<&Value> {
        match self {
            Error::Engine { value, .. } => value.as_ref(),
            _ => None,
        }
    }

    /// The type name of the engine-produced error value, if it is a
    /// possrep object. Lets callers distinguish e.g. `type_error` from
    /// `name_error` without string-matching the message.
    pub fn error_type_name(&self) -> Option<String> {
        match self.error_value() {
            Some(Value::Possrep(p)) => Some(p.type_name()),
            _ => None,
        }
    }
}

fn describe_error_value(value: &Value) -> String {
    match value {
        Value::Possrep(p) => {
            let mut buf = p.type_name();
            if let Ok(Value::String(msg)) = p.get_property("msg") {
                buf.push_str(": ");
                buf.push_str(&msg);
            }
            buf
        }
        other => other.to_string(),
    }
}
