//! The embedded interpreter contract.

use crate::{ObjectHandle, WireValue};
use std::any::Any;
use tabula_core::{Possrep, Result, Type};

/// A host object owned by the engine on behalf of an implemented type.
///
/// The engine stores these opaquely and hands them back to the registered
/// trampolines; it never looks inside.
pub type HostObject = Box<dyn Any + Send>;

/// Constructs a host object from a possrep's component values, in
/// declaration order.
pub type Selector = Box<dyn Fn(&[WireValue]) -> Result<HostObject> + Send>;

/// Reads one possrep component from a host object.
pub type Getter = Box<dyn Fn(&mut dyn Any) -> Result<WireValue> + Send>;

/// Writes one possrep component of a host object.
pub type Setter = Box<dyn Fn(&mut dyn Any, WireValue) -> Result<()> + Send>;

/// An embedded interpreter instance.
///
/// The runtime treats this as an opaque synchronous call boundary. The
/// resource behind it is process-wide and not reentrant-safe: callers must
/// hold the engine gate for the full duration of every call (the session
/// layer enforces this).
pub trait Interpreter: Send {
    /// Allocates the native interpreter resource.
    fn init(&mut self) -> Result<()>;

    /// Releases the native interpreter resource. Handles issued by this
    /// instance are invalid afterwards.
    fn destroy(&mut self) -> Result<()>;

    /// Runs a statement, discarding any result.
    fn execute_statement(&mut self, code: &str) -> Result<()>;

    /// Evaluates an expression.
    fn evaluate_expression(&mut self, expr: &str) -> Result<WireValue>;

    /// Assigns a value to a variable. The value is assumed to have passed
    /// the host-side structural check; the engine still applies its own
    /// semantic checks.
    fn set_variable(&mut self, name: &str, value: WireValue) -> Result<()>;

    /// The declared type of a variable, or `None` if no such variable is
    /// declared.
    fn variable_type(&mut self, name: &str) -> Result<Option<Type>>;

    /// The possreps of a scalar type, or `None` if the engine knows no
    /// type of that name.
    fn type_possreps(&mut self, name: &str) -> Result<Option<Vec<Possrep>>>;

    /// Registers the selector for one possrep of a type.
    fn register_selector(
        &mut self,
        type_name: &str,
        possrep: &str,
        selector: Selector,
    ) -> Result<()>;

    /// Registers a component accessor under an engine-visible name.
    fn register_getter(
        &mut self,
        op_name: &str,
        type_name: &str,
        possrep: &str,
        component: usize,
        getter: Getter,
    ) -> Result<()>;

    /// Registers a component mutator under an engine-visible name.
    fn register_setter(
        &mut self,
        op_name: &str,
        type_name: &str,
        possrep: &str,
        component: usize,
        setter: Setter,
    ) -> Result<()>;

    /// Marks a type as implemented, enabling engine-level operations on
    /// its values to dispatch through the registered trampolines.
    fn mark_type_implemented(&mut self, type_name: &str) -> Result<()>;

    /// Reads a property of a possrep-typed object.
    fn object_property(&mut self, handle: ObjectHandle, name: &str) -> Result<WireValue>;

    /// Writes a property of a possrep-typed object.
    fn set_object_property(
        &mut self,
        handle: ObjectHandle,
        name: &str,
        value: WireValue,
    ) -> Result<()>;

    /// The type name of a possrep-typed object.
    fn object_type_name(&mut self, handle: ObjectHandle) -> Result<String>;

    /// The possreps of a possrep-typed object's type.
    fn object_possreps(&mut self, handle: ObjectHandle) -> Result<Vec<Possrep>>;

    /// Engine-side structural equality of two objects.
    fn objects_equal(&mut self, a: ObjectHandle, b: ObjectHandle) -> Result<bool>;

    /// Releases an interpreter-owned object.
    fn release_object(&mut self, handle: ObjectHandle) -> Result<()>;
}
