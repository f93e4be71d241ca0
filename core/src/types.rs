//! Type descriptors for engine values.
//!
//! Only scalar types carry a name. Tuple, relation and array types are
//! anonymous and compared structurally; scalar types are nominal.

use std::collections::HashMap;
use std::fmt;

/// A name/type pair: one tuple attribute or one possrep component.
#[derive(Debug, Clone, PartialEq)]
pub struct NameTypePair {
    name: String,
    ty: Type,
}

impl NameTypePair {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &Type {
        &self.ty
    }
}

/// A possible representation: a named, ordered list of components.
///
/// Unlike tuple attributes, component order is significant; it is the
/// selector argument order.
#[derive(Debug, Clone, PartialEq)]
pub struct Possrep {
    name: String,
    components: Vec<NameTypePair>,
}

impl Possrep {
    pub fn new(name: impl Into<String>, components: Vec<NameTypePair>) -> Self {
        Self {
            name: name.into(),
            components,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[NameTypePair] {
        &self.components
    }

    pub fn component(&self, index: usize) -> Option<&NameTypePair> {
        self.components.get(index)
    }
}

const BUILTIN_NAMES: [&str; 5] = ["boolean", "integer", "string", "float", "binary"];

/// A scalar type: a name plus its declared possible representations.
///
/// The five built-in types have no possreps.
#[derive(Debug, Clone)]
pub struct ScalarType {
    name: String,
    possreps: Vec<Possrep>,
}

impl ScalarType {
    pub fn new(name: impl Into<String>, possreps: Vec<Possrep>) -> Self {
        Self {
            name: name.into(),
            possreps,
        }
    }

    pub fn boolean() -> Self {
        Self::new("boolean", Vec::new())
    }

    pub fn integer() -> Self {
        Self::new("integer", Vec::new())
    }

    pub fn string() -> Self {
        Self::new("string", Vec::new())
    }

    pub fn float() -> Self {
        Self::new("float", Vec::new())
    }

    pub fn binary() -> Self {
        Self::new("binary", Vec::new())
    }

    /// Returns the built-in scalar type of the given name, if any.
    pub fn builtin(name: &str) -> Option<Self> {
        if BUILTIN_NAMES.contains(&name) {
            Some(Self::new(name, Vec::new()))
        } else {
            None
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn possreps(&self) -> &[Possrep] {
        &self.possreps
    }

    pub fn is_builtin(&self) -> bool {
        BUILTIN_NAMES.contains(&self.name.as_str())
    }
}

/// Scalar types are nominal: two descriptors with the same name denote the
/// same engine type even when only one side has its possreps loaded.
impl PartialEq for ScalarType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ScalarType {}

/// A tuple type: an unordered mapping from attribute name to type.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TupleType {
    attributes: HashMap<String, Type>,
}

impl TupleType {
    pub fn new(attributes: impl IntoIterator<Item = NameTypePair>) -> Self {
        Self {
            attributes: attributes
                .into_iter()
                .map(|pair| (pair.name, pair.ty))
                .collect(),
        }
    }

    pub fn attribute(&self, name: &str) -> Option<&Type> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &Type)> {
        self.attributes.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// A relation type: a set of tuples sharing one tuple type.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationType {
    base: TupleType,
}

impl RelationType {
    pub fn new(base: TupleType) -> Self {
        Self { base }
    }

    pub fn tuple_type(&self) -> &TupleType {
        &self.base
    }
}

/// An array type: an ordered sequence of one element type.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayType {
    element: Box<Type>,
}

impl ArrayType {
    pub fn new(element: Type) -> Self {
        Self {
            element: Box::new(element),
        }
    }

    pub fn element_type(&self) -> &Type {
        &self.element
    }
}

/// A type descriptor.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Scalar(ScalarType),
    Tuple(TupleType),
    Relation(RelationType),
    Array(ArrayType),
}

impl Type {
    pub fn boolean() -> Self {
        Type::Scalar(ScalarType::boolean())
    }

    pub fn integer() -> Self {
        Type::Scalar(ScalarType::integer())
    }

    pub fn string() -> Self {
        Type::Scalar(ScalarType::string())
    }

    pub fn float() -> Self {
        Type::Scalar(ScalarType::float())
    }

    pub fn binary() -> Self {
        Type::Scalar(ScalarType::binary())
    }

    pub fn tuple(attributes: impl IntoIterator<Item = NameTypePair>) -> Self {
        Type::Tuple(TupleType::new(attributes))
    }

    pub fn relation(attributes: impl IntoIterator<Item = NameTypePair>) -> Self {
        Type::Relation(RelationType::new(TupleType::new(attributes)))
    }

    pub fn array(element: Type) -> Self {
        Type::Array(ArrayType::new(element))
    }

    /// The type name. Only scalar types are named.
    pub fn name(&self) -> Option<&str> {
        match self {
            Type::Scalar(scalar) => Some(scalar.name()),
            _ => None,
        }
    }

    pub fn is_scalar(&self) -> bool {
        matches!(self, Type::Scalar(_))
    }

    pub fn as_scalar(&self) -> Option<&ScalarType> {
        match self {
            Type::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Scalar(scalar) => write!(f, "{}", scalar.name()),
            Type::Tuple(tuple) => {
                write!(f, "tuple {{ ")?;
                for (i, (name, ty)) in tuple.attributes().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", name, ty)?;
                }
                write!(f, " }}")
            }
            Type::Relation(rel) => {
                write!(f, "relation {{ ")?;
                for (i, (name, ty)) in rel.tuple_type().attributes().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", name, ty)?;
                }
                write!(f, " }}")
            }
            Type::Array(arr) => write!(f, "array {}", arr.element_type()),
        }
    }
}
