//! Tuples: unordered attribute maps with structural equality.

use crate::Value;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

/// An unordered mapping from attribute name to value.
///
/// Equality and hashing are structural: two tuples with the same
/// attributes compare equal and hash equal regardless of the order the
/// attributes were set in.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Tuple {
    attributes: HashMap<String, Value>,
}

impl Tuple {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets an attribute. A repeated name overwrites the previous value.
    ///
    /// # Panics
    ///
    /// Panics if the attribute name is empty.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        assert!(!name.is_empty(), "tuple attribute name must be non-empty");
        self.attributes.insert(name, value);
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    pub fn with_attribute(mut self, name: impl Into<String>, value: Value) -> Self {
        self.set_attribute(name, value);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// A stand-alone hash of this tuple, usable without a `Hasher`.
    pub fn hash_code(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.hash(&mut hasher);
        hasher.finish()
    }
}

impl Eq for Tuple {}

impl Hash for Tuple {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Wrapping sum of per-attribute hashes so order never matters.
        let mut sum = 0u64;
        for (name, value) in &self.attributes {
            let mut hasher = DefaultHasher::new();
            name.hash(&mut hasher);
            value.hash(&mut hasher);
            sum = sum.wrapping_add(hasher.finish());
        }
        state.write_usize(self.attributes.len());
        state.write_u64(sum);
    }
}

impl FromIterator<(String, Value)> for Tuple {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut tuple = Tuple::new();
        for (name, value) in iter {
            tuple.set_attribute(name, value);
        }
        tuple
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TUPLE {{ ")?;
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{} {}", name, value)?;
        }
        write!(f, " }}")
    }
}
