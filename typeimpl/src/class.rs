//! The host class registration table.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tabula_core::{Error, Result, Type, Value};
use tabula_engine::HostObject;

/// The host-side mapping of the property-capable built-in scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostKind {
    Boolean,
    Integer,
    Float,
    String,
}

impl HostKind {
    /// The host kind a component's engine type maps to, if any.
    pub fn of(ty: &Type) -> Option<HostKind> {
        match ty.name()? {
            "boolean" => Some(HostKind::Boolean),
            "integer" => Some(HostKind::Integer),
            "float" => Some(HostKind::Float),
            "string" => Some(HostKind::String),
            _ => None,
        }
    }

    pub fn matches(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (HostKind::Boolean, Value::Boolean(_))
                | (HostKind::Integer, Value::Integer(_))
                | (HostKind::Float, Value::Float(_))
                | (HostKind::String, Value::String(_))
        )
    }
}

impl fmt::Display for HostKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HostKind::Boolean => "boolean",
            HostKind::Integer => "integer",
            HostKind::Float => "float",
            HostKind::String => "string",
        };
        write!(f, "{}", label)
    }
}

pub(crate) type ConstructorFn = Arc<dyn Fn() -> HostObject + Send + Sync>;
type MethodFn = Arc<dyn Fn(&mut dyn Any, &[Value]) -> Result<Option<Value>> + Send + Sync>;

/// One callable in a class's method table, with its declared signature.
#[derive(Clone)]
pub struct HostMethod {
    params: Vec<HostKind>,
    returns: Option<HostKind>,
    body: MethodFn,
}

impl HostMethod {
    pub fn params(&self) -> &[HostKind] {
        &self.params
    }

    pub fn returns(&self) -> Option<HostKind> {
        self.returns
    }

    pub fn invoke(&self, instance: &mut dyn Any, args: &[Value]) -> Result<Option<Value>> {
        (self.body)(instance, args)
    }
}

/// A host class: the capability table [`implement_type`] checks against
/// and the proxy adapter reads method names from.
///
/// [`implement_type`]: crate::implement_type
#[derive(Clone)]
pub struct HostClass {
    pub(crate) name: String,
    pub(crate) constructor: Option<ConstructorFn>,
    pub(crate) methods: HashMap<String, HostMethod>,
}

impl HostClass {
    pub fn builder(name: impl Into<String>) -> HostClassBuilder {
        HostClassBuilder {
            name: name.into(),
            constructor: None,
            methods: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Constructs a fresh instance, if the class is concrete.
    pub fn construct(&self) -> Option<HostObject> {
        self.constructor.as_ref().map(|ctor| ctor())
    }

    /// A class with no constructor is a behavioral interface: it declares
    /// method signatures but has no concrete state to materialize.
    pub fn is_interface(&self) -> bool {
        self.constructor.is_none()
    }

    pub fn method(&self, name: &str) -> Option<&HostMethod> {
        self.methods.get(name)
    }

    pub fn method_names(&self) -> impl Iterator<Item = &str> {
        self.methods.keys().map(String::as_str)
    }
}

impl fmt::Debug for HostClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostClass")
            .field("name", &self.name)
            .field("interface", &self.is_interface())
            .field("methods", &self.methods.len())
            .finish()
    }
}

/// Builder for [`HostClass`].
pub struct HostClassBuilder {
    name: String,
    constructor: Option<ConstructorFn>,
    methods: HashMap<String, HostMethod>,
}

impl HostClassBuilder {
    /// The zero-argument constructor.
    pub fn constructor<T, F>(mut self, make: F) -> Self
    where
        T: Any + Send,
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.constructor = Some(Arc::new(move || Box::new(make()) as HostObject));
        self
    }

    /// A `get<Name>`-style accessor: no parameters, returns `kind`.
    pub fn getter<T, F>(mut self, name: impl Into<String>, kind: HostKind, get: F) -> Self
    where
        T: Any,
        F: Fn(&T) -> Value + Send + Sync + 'static,
    {
        let body: MethodFn = Arc::new(move |instance, _args| {
            let instance = instance.downcast_mut::<T>().ok_or_else(|| {
                Error::configuration("accessor invoked on an instance of another class")
            })?;
            Ok(Some(get(instance)))
        });
        self.methods.insert(
            name.into(),
            HostMethod {
                params: Vec::new(),
                returns: Some(kind),
                body,
            },
        );
        self
    }

    /// A `set<Name>`-style mutator: one parameter of `kind`, no return.
    pub fn setter<T, F>(mut self, name: impl Into<String>, kind: HostKind, set: F) -> Self
    where
        T: Any,
        F: Fn(&mut T, Value) + Send + Sync + 'static,
    {
        let body: MethodFn = Arc::new(move |instance, args| {
            let instance = instance.downcast_mut::<T>().ok_or_else(|| {
                Error::configuration("mutator invoked on an instance of another class")
            })?;
            let [arg] = args else {
                return Err(Error::configuration("mutator takes exactly one argument"));
            };
            set(instance, arg.clone());
            Ok(None)
        });
        self.methods.insert(
            name.into(),
            HostMethod {
                params: vec![kind],
                returns: None,
                body,
            },
        );
        self
    }

    /// An accessor signature without a body, for interface classes used
    /// with the proxy adapter.
    pub fn abstract_getter(mut self, name: impl Into<String>, kind: HostKind) -> Self {
        self.methods.insert(
            name.into(),
            HostMethod {
                params: Vec::new(),
                returns: Some(kind),
                body: abstract_body(),
            },
        );
        self
    }

    /// A mutator signature without a body, for interface classes used with
    /// the proxy adapter.
    pub fn abstract_setter(mut self, name: impl Into<String>, kind: HostKind) -> Self {
        self.methods.insert(
            name.into(),
            HostMethod {
                params: vec![kind],
                returns: None,
                body: abstract_body(),
            },
        );
        self
    }

    pub fn build(self) -> HostClass {
        HostClass {
            name: self.name,
            constructor: self.constructor,
            methods: self.methods,
        }
    }
}

fn abstract_body() -> MethodFn {
    Arc::new(|_instance, _args| Err(Error::unsupported("abstract method has no body")))
}
