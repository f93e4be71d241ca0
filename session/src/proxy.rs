//! The proxy adapter: an interface-shaped view over a possrep value.

use std::collections::HashMap;
use tabula_core::{Error, PossrepRef, Result, Value};
use tabula_typeimpl::HostClass;

enum Dispatch {
    Get(String),
    Set(String),
}

/// A dynamic implementation of a behavioral interface over a possrep
/// value: `get<Name>` calls forward to `get_property`, `set<Name>` calls
/// to `set_property`, anything else fails with `Unsupported`.
///
/// The method-to-property map is built once at construction from the
/// interface class's method names; the property name is the method suffix
/// with its first letter lower-cased.
pub struct PossrepProxy {
    target: PossrepRef,
    methods: HashMap<String, Dispatch>,
}

impl PossrepProxy {
    /// Builds a proxy over `target` from an interface class.
    pub fn from_class(target: PossrepRef, class: &HostClass) -> Self {
        let methods = class
            .method_names()
            .filter_map(|name| Some((name.to_string(), dispatch_for(name)?)))
            .collect();
        Self { target, methods }
    }

    /// Invokes an interface method by name. Getters take no arguments and
    /// return the property value; setters take exactly one argument and
    /// return nothing.
    pub fn call(&self, method: &str, args: &[Value]) -> Result<Option<Value>> {
        match self.methods.get(method) {
            Some(Dispatch::Get(property)) => {
                if !args.is_empty() {
                    return Err(Error::unsupported(format!(
                        "{} takes no arguments",
                        method
                    )));
                }
                Ok(Some(self.target.get_property(property)?))
            }
            Some(Dispatch::Set(property)) => {
                let [arg] = args else {
                    return Err(Error::unsupported(format!(
                        "{} takes exactly one argument",
                        method
                    )));
                };
                self.target.set_property(property, arg.clone())?;
                Ok(None)
            }
            None => Err(Error::unsupported(method.to_string())),
        }
    }

    /// The wrapped possrep value.
    pub fn target(&self) -> &PossrepRef {
        &self.target
    }
}

fn dispatch_for(method: &str) -> Option<Dispatch> {
    if let Some(rest) = method.strip_prefix("get") {
        return property_of(rest).map(Dispatch::Get);
    }
    if let Some(rest) = method.strip_prefix("set") {
        return property_of(rest).map(Dispatch::Set);
    }
    None
}

fn property_of(suffix: &str) -> Option<String> {
    let mut chars = suffix.chars();
    let first = chars.next()?;
    Some(first.to_lowercase().collect::<String>() + chars.as_str())
}
