//! Session backends for the Tabula client runtime.
//!
//! A [`Session`] executes statements and evaluates expressions against a
//! relational engine, marshalling every result into the host value model.
//! Two backends implement the same contract:
//!
//! - [`EmbeddedSession`]: direct calls against an in-process interpreter
//!   instance, serialized process-wide by the [`EngineGate`].
//! - [`RemoteSession`]: read-only evaluation over HTTP+JSON.
//!
//! Callers that only need the contract work with `&dyn Session` and never
//! learn which backend they are talking to.

mod embedded;
mod gate;
mod proxy;
mod remote;
mod session;

pub use embedded::*;
pub use gate::*;
pub use proxy::*;
pub use remote::*;
pub use session::*;

use tabula_core::Result;
use tabula_engine::Interpreter;

/// Opens an embedded session over an interpreter instance.
pub fn create_session(interp: Box<dyn Interpreter>) -> Result<EmbeddedSession> {
    EmbeddedSession::open(interp)
}

/// Connects a read-only session to a remote evaluation endpoint.
pub fn create_remote_session(endpoint: &str) -> Result<RemoteSession> {
    RemoteSession::connect(endpoint)
}
