//! Engine-to-host conversion.

use tabula_core::{ArrayValue, ByteArray, Error, Relation, Result, Tuple, Value};
use tabula_engine::{ObjectHandle, WireValue};

/// Wraps interpreter-owned object references into owning-session possrep
/// handles during conversion.
pub trait HandleBinder {
    fn bind_handle(&self, handle: ObjectHandle) -> Result<Value>;
}

/// Binder for conversions that can never produce engine-backed handles,
/// e.g. inside trampolines where component values are always built-in
/// scalars.
pub struct NoHandles;

impl HandleBinder for NoHandles {
    fn bind_handle(&self, handle: ObjectHandle) -> Result<Value> {
        Err(Error::engine(format!(
            "unexpected object reference {} in a handle-free conversion",
            handle.raw()
        )))
    }
}

/// Converts an engine wire value to a host value.
///
/// Tuple attribute order is discarded; relation bodies are deduplicated;
/// array element types are taken from the declaration, never inferred.
pub fn to_host(wire: WireValue, binder: &dyn HandleBinder) -> Result<Value> {
    Ok(match wire {
        WireValue::Boolean(b) => Value::Boolean(b),
        WireValue::Integer(i) => Value::Integer(i),
        WireValue::Float(f) => Value::Float(f),
        WireValue::String(s) => Value::String(s),
        WireValue::Binary(bytes) => Value::Binary(ByteArray::new(bytes)),
        WireValue::Tuple(attributes) => Value::Tuple(tuple_to_host(attributes, binder)?),
        WireValue::Relation(body) => {
            let mut relation = Relation::new();
            for element in body {
                let kind = element.kind();
                let WireValue::Tuple(attributes) = element else {
                    return Err(Error::engine(format!(
                        "relation body element is {}, not a tuple",
                        kind
                    )));
                };
                relation.insert(tuple_to_host(attributes, binder)?);
            }
            Value::Relation(relation)
        }
        WireValue::Array { element, elements } => {
            let converted = elements
                .into_iter()
                .map(|e| to_host(e, binder))
                .collect::<Result<Vec<_>>>()?;
            Value::Array(ArrayValue::new(element, converted))
        }
        WireValue::Handle(handle) => binder.bind_handle(handle)?,
        WireValue::Selector { type_name, .. } => {
            // Selector invocation is a host-to-engine form only.
            return Err(Error::engine(format!(
                "selector encoding of type {} is not a result form",
                type_name
            )));
        }
    })
}

fn tuple_to_host(
    attributes: Vec<(String, WireValue)>,
    binder: &dyn HandleBinder,
) -> Result<Tuple> {
    let mut tuple = Tuple::new();
    for (name, value) in attributes {
        if name.is_empty() {
            return Err(Error::engine("tuple attribute with empty name"));
        }
        tuple.set_attribute(name, to_host(value, binder)?);
    }
    Ok(tuple)
}
