//! The unified session contract.

use crate::PossrepProxy;
use tabula_core::{Result, ScalarType, Value};
use tabula_engine::HostObject;
use tabula_typeimpl::HostClass;

/// A materialized evaluation result: a concrete host instance, or a proxy
/// view when the target class is a behavioral interface.
pub enum Materialized {
    Instance(HostObject),
    Proxy(PossrepProxy),
}

/// A session against a relational engine.
///
/// Both backends implement this contract; operations a backend cannot
/// honor fail with `Unsupported` rather than being absent, so the error
/// path is explicit and testable.
pub trait Session: Send + Sync {
    /// Runs a statement, discarding any result. Unit-of-work delimiters
    /// (`begin tx;`, `commit;`, `rollback;`) pass through unchanged.
    fn execute(&self, code: &str) -> Result<()>;

    /// Evaluates an expression and returns its value.
    fn evaluate(&self, expr: &str) -> Result<Value>;

    /// Evaluates an expression whose value must be possrep-typed and
    /// copies the first possrep's properties into `instance` through the
    /// class's `set<Name>` methods. The source value is released
    /// afterwards.
    fn evaluate_into(
        &self,
        expr: &str,
        class: &HostClass,
        instance: &mut HostObject,
    ) -> Result<()>;

    /// Evaluates an expression into a fresh instance of `class`, or into a
    /// proxy view when `class` is a behavioral interface.
    fn evaluate_as(&self, expr: &str, class: &HostClass) -> Result<Materialized>;

    /// Assigns a value to an engine variable. The value's shape is checked
    /// against the variable's declared type before any binding call.
    fn set_var(&self, name: &str, value: Value) -> Result<()>;

    /// Wires a host class up as the implementation of a scalar type.
    fn implement_type(&self, ty: &ScalarType, class: &HostClass) -> Result<()>;

    /// Closes the session, releasing any engine resource it owns. Every
    /// further operation fails with `IllegalState`.
    fn close(&self) -> Result<()>;
}
