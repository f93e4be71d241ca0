//! Runtime values crossing the engine/host boundary.
//!
//! `Value` covers everything an expression can produce: the five built-in
//! scalars, the structured containers (tuple, relation, array), and
//! possrep-typed scalar handles. Equality and hashing are structural
//! throughout so relation set semantics work on any element type.

use crate::{PossrepRef, Tuple, Type};
use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

/// A value observed at the engine/host boundary.
#[derive(Clone)]
pub enum Value {
    /// Only produced by the remote backend for JSON `null`; the embedded
    /// boundary never carries it.
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Binary(ByteArray),
    Tuple(Tuple),
    Relation(Relation),
    Array(ArrayValue),
    /// A value of a scalar type with possible representations.
    Possrep(PossrepRef),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_binary(&self) -> Option<&ByteArray> {
        match self {
            Value::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&Tuple> {
        match self {
            Value::Tuple(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_relation(&self) -> Option<&Relation> {
        match self {
            Value::Relation(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_possrep(&self) -> Option<&PossrepRef> {
        match self {
            Value::Possrep(p) => Some(p),
            _ => None,
        }
    }

    /// A short label for the kind of value, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Boolean(_) => "boolean",
            Value::Integer(_) => "integer",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Binary(_) => "binary",
            Value::Tuple(_) => "tuple",
            Value::Relation(_) => "relation",
            Value::Array(_) => "array",
            Value::Possrep(_) => "scalar",
        }
    }

    /// A stand-alone hash of this value, usable without a `Hasher`.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Binary(a), Value::Binary(b)) => a == b,
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Relation(a), Value::Relation(b)) => a == b,
            (Value::Array(a), Value::Array(b)) => a == b,
            (Value::Possrep(a), Value::Possrep(b)) => a.eq_object(b.as_ref()),
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Value::Null => state.write_u8(0),
            Value::Boolean(b) => {
                state.write_u8(1);
                b.hash(state);
            }
            Value::Integer(i) => {
                state.write_u8(2);
                i.hash(state);
            }
            Value::Float(f) => {
                state.write_u8(3);
                f.to_bits().hash(state);
            }
            Value::String(s) => {
                state.write_u8(4);
                s.hash(state);
            }
            Value::Binary(b) => {
                state.write_u8(5);
                b.hash(state);
            }
            Value::Tuple(t) => {
                state.write_u8(6);
                t.hash(state);
            }
            Value::Relation(r) => {
                state.write_u8(7);
                r.hash(state);
            }
            Value::Array(a) => {
                state.write_u8(8);
                a.hash(state);
            }
            Value::Possrep(p) => {
                state.write_u8(9);
                state.write_u64(p.hash_value());
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Boolean(b) => f.debug_tuple("Boolean").field(b).finish(),
            Value::Integer(i) => f.debug_tuple("Integer").field(i).finish(),
            Value::Float(x) => f.debug_tuple("Float").field(x).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Binary(b) => f.debug_tuple("Binary").field(b).finish(),
            Value::Tuple(t) => f.debug_tuple("Tuple").field(t).finish(),
            Value::Relation(r) => f.debug_tuple("Relation").field(r).finish(),
            Value::Array(a) => f.debug_tuple("Array").field(a).finish(),
            Value::Possrep(p) => f
                .debug_tuple("Possrep")
                .field(&p.type_name())
                .finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Integer(i) => write!(f, "{}", i),
            Value::Float(x) => write!(f, "{}", x),
            Value::String(s) => write!(f, "\"{}\"", s),
            Value::Binary(b) => write!(f, "binary({} bytes)", b.len()),
            Value::Tuple(t) => write!(f, "{}", t),
            Value::Relation(r) => write!(f, "{}", r),
            Value::Array(a) => {
                write!(f, "[")?;
                for (i, item) in a.elements().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Possrep(p) => write!(f, "{}", p.type_name()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Boolean(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i as i64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value::Binary(ByteArray::new(bytes))
    }
}

impl From<ByteArray> for Value {
    fn from(bytes: ByteArray) -> Self {
        Value::Binary(bytes)
    }
}

impl From<Tuple> for Value {
    fn from(t: Tuple) -> Self {
        Value::Tuple(t)
    }
}

impl From<Relation> for Value {
    fn from(r: Relation) -> Self {
        Value::Relation(r)
    }
}

impl From<ArrayValue> for Value {
    fn from(a: ArrayValue) -> Self {
        Value::Array(a)
    }
}

/// A resizable byte buffer.
///
/// Growing through [`set_len`](Self::set_len) zero-fills; shrinking
/// truncates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct ByteArray {
    bytes: Vec<u8>,
}

impl ByteArray {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Resizes the buffer. The length is only ever changed through this
    /// operation.
    pub fn set_len(&mut self, len: usize) {
        self.bytes.resize(len, 0);
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for ByteArray {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for ByteArray {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

/// A set of same-typed tuples: no duplicates, no order.
#[derive(Debug, Clone, Default)]
pub struct Relation {
    tuples: Vec<Tuple>,
}

impl Relation {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tuple, suppressing duplicates.
    ///
    /// Returns `true` if the tuple was not already present.
    pub fn insert(&mut self, tuple: Tuple) -> bool {
        if self.tuples.contains(&tuple) {
            return false;
        }
        self.tuples.push(tuple);
        true
    }

    pub fn contains(&self, tuple: &Tuple) -> bool {
        self.tuples.contains(tuple)
    }

    pub fn len(&self) -> usize {
        self.tuples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tuples.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tuple> {
        self.tuples.iter()
    }
}

impl FromIterator<Tuple> for Relation {
    fn from_iter<I: IntoIterator<Item = Tuple>>(iter: I) -> Self {
        let mut relation = Relation::new();
        for tuple in iter {
            relation.insert(tuple);
        }
        relation
    }
}

/// Set equality: element order is irrelevant.
impl PartialEq for Relation {
    fn eq(&self, other: &Relation) -> bool {
        self.len() == other.len() && self.tuples.iter().all(|t| other.contains(t))
    }
}

impl Eq for Relation {}

impl Hash for Relation {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Wrapping sum of element hashes keeps the hash order-independent.
        let sum = self
            .tuples
            .iter()
            .fold(0u64, |acc, t| acc.wrapping_add(t.hash_code()));
        state.write_usize(self.tuples.len());
        state.write_u64(sum);
    }
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RELATION {{ ")?;
        for (i, tuple) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", tuple)?;
        }
        write!(f, " }}")
    }
}

/// An ordered sequence of same-typed elements.
///
/// The element type is declared, not inferred: embedded results always
/// carry it, remote results are untyped. Resizing happens only through
/// [`set_len`](Self::set_len).
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayValue {
    element_type: Option<Type>,
    elements: Vec<Value>,
}

impl ArrayValue {
    pub fn new(element_type: Type, elements: Vec<Value>) -> Self {
        Self {
            element_type: Some(element_type),
            elements,
        }
    }

    /// An array with no declared element type, as decoded from the remote
    /// backend.
    pub fn untyped(elements: Vec<Value>) -> Self {
        Self {
            element_type: None,
            elements,
        }
    }

    pub fn element_type(&self) -> Option<&Type> {
        self.element_type.as_ref()
    }

    pub fn elements(&self) -> &[Value] {
        &self.elements
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Resizes the array: truncates, or pads with `Value::Null` when
    /// growing.
    pub fn set_len(&mut self, len: usize) {
        self.elements.resize(len, Value::Null);
    }
}

impl Eq for ArrayValue {}

impl Hash for ArrayValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // The declared element type does not contribute; equal arrays of
        // differing declaredness may collide, which is harmless.
        state.write_usize(self.elements.len());
        for element in &self.elements {
            element.hash(state);
        }
    }
}
