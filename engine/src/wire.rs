//! The boundary encoding for values crossing into and out of the engine.

use tabula_core::Type;

/// A reference into interpreter-owned storage.
///
/// Handles are only meaningful to the interpreter instance that issued
/// them, and only until it releases the object or is destroyed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectHandle(u64);

impl ObjectHandle {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A value as the engine boundary carries it.
///
/// The encoding is deliberately flat and engine-shaped: tuples keep the
/// attribute order the engine produced them in (the host side discards
/// it), relation bodies may contain duplicates (the host side suppresses
/// them), arrays carry their declared element type.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Binary(Vec<u8>),
    /// Ordered attribute list; the order is engine-incidental.
    Tuple(Vec<(String, WireValue)>),
    /// Tuple list forming a relation body; elements are `Tuple` values.
    Relation(Vec<WireValue>),
    /// Declared element type plus the elements.
    Array {
        element: Type,
        elements: Vec<WireValue>,
    },
    /// A possrep-typed value living in interpreter-owned storage.
    Handle(ObjectHandle),
    /// A possrep-typed value sent to the engine by invoking a selector:
    /// the possrep's components in declaration order.
    Selector {
        type_name: String,
        possrep: String,
        args: Vec<WireValue>,
    },
}

impl WireValue {
    /// A short label for the kind of wire value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            WireValue::Boolean(_) => "boolean",
            WireValue::Integer(_) => "integer",
            WireValue::Float(_) => "float",
            WireValue::String(_) => "string",
            WireValue::Binary(_) => "binary",
            WireValue::Tuple(_) => "tuple",
            WireValue::Relation(_) => "relation",
            WireValue::Array { .. } => "array",
            WireValue::Handle(_) => "scalar",
            WireValue::Selector { .. } => "scalar",
        }
    }
}
