//! Host-to-engine conversion with the strict structural check.
//!
//! The shape of the host value is verified against the declared engine
//! type before anything is sent: tuple attribute name sets must match
//! exactly, array element types must agree with the declaration, possrep
//! type names must match nominally. Shape violations fail with
//! `TypeMismatch` and no engine call takes place. Scalar subtype
//! discrepancies inside a correct shape (an integer where a float is
//! declared) are passed through for the engine's own semantic check.

use tabula_core::{Error, Result, ScalarType, Tuple, TupleType, Type, Value};
use tabula_engine::{ObjectHandle, WireValue};

/// Converts a host value to its wire form for a target of the declared
/// type.
pub fn to_engine(value: &Value, expected: &Type) -> Result<WireValue> {
    match expected {
        Type::Scalar(scalar) => scalar_to_engine(value, scalar),
        Type::Tuple(tuple_type) => match value {
            Value::Tuple(tuple) => tuple_to_engine(tuple, tuple_type),
            other => Err(shape_mismatch(other, expected)),
        },
        Type::Relation(relation_type) => match value {
            Value::Relation(relation) => {
                let body = relation
                    .iter()
                    .map(|tuple| tuple_to_engine(tuple, relation_type.tuple_type()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(WireValue::Relation(body))
            }
            other => Err(shape_mismatch(other, expected)),
        },
        Type::Array(array_type) => match value {
            Value::Array(array) => {
                if let Some(declared) = array.element_type() {
                    if declared != array_type.element_type() {
                        return Err(Error::type_mismatch(format!(
                            "array of {} where array of {} expected",
                            declared,
                            array_type.element_type()
                        )));
                    }
                }
                let elements = array
                    .elements()
                    .iter()
                    .map(|element| to_engine(element, array_type.element_type()))
                    .collect::<Result<Vec<_>>>()?;
                Ok(WireValue::Array {
                    element: array_type.element_type().clone(),
                    elements,
                })
            }
            other => Err(shape_mismatch(other, expected)),
        },
    }
}

fn scalar_to_engine(value: &Value, expected: &ScalarType) -> Result<WireValue> {
    match value {
        // Built-in scalars are encoded by their own kind; whether the kind
        // agrees with the declared scalar type is the engine's semantic
        // check, not a structural one.
        Value::Boolean(b) => Ok(WireValue::Boolean(*b)),
        Value::Integer(i) => Ok(WireValue::Integer(*i)),
        Value::Float(f) => Ok(WireValue::Float(*f)),
        Value::String(s) => Ok(WireValue::String(s.clone())),
        Value::Binary(b) => Ok(WireValue::Binary(b.as_slice().to_vec())),
        Value::Possrep(object) => {
            let type_name = object.type_name();
            if type_name != expected.name() {
                return Err(Error::type_mismatch(format!(
                    "value of type {} where {} expected",
                    type_name,
                    expected.name()
                )));
            }
            if let Some(raw) = object.object_ref() {
                return Ok(WireValue::Handle(ObjectHandle::new(raw)));
            }
            // Host-native value: encode through the first possrep's
            // selector. Prefer the value's own possrep information, fall
            // back to the declared type's.
            let own = object.scalar_type()?;
            let possrep = own
                .possreps()
                .first()
                .or_else(|| expected.possreps().first())
                .cloned()
                .ok_or_else(|| {
                    Error::type_mismatch(format!("type {} has no possreps", expected.name()))
                })?;
            let mut args = Vec::with_capacity(possrep.components().len());
            for component in possrep.components() {
                let property = object.get_property(component.name())?;
                args.push(to_engine(&property, component.ty())?);
            }
            Ok(WireValue::Selector {
                type_name,
                possrep: possrep.name().to_string(),
                args,
            })
        }
        other => Err(shape_mismatch(other, &Type::Scalar(expected.clone()))),
    }
}

fn tuple_to_engine(tuple: &Tuple, expected: &TupleType) -> Result<WireValue> {
    for name in expected.attribute_names() {
        if tuple.attribute(name).is_none() {
            return Err(Error::type_mismatch(format!(
                "missing attribute `{}`",
                name
            )));
        }
    }
    let mut attributes = Vec::with_capacity(tuple.len());
    for (name, value) in tuple.iter() {
        let Some(attribute_type) = expected.attribute(name) else {
            return Err(Error::type_mismatch(format!(
                "unexpected attribute `{}`",
                name
            )));
        };
        attributes.push((name.to_string(), to_engine(value, attribute_type)?));
    }
    Ok(WireValue::Tuple(attributes))
}

/// Converts a host value to wire form by its own shape, with no declared
/// target type.
///
/// Used for positions whose declared type the engine checks itself, such
/// as property assignment on a possrep object. Arrays must carry their
/// declared element type; `Null` has no engine representation.
pub fn to_engine_untyped(value: &Value) -> Result<WireValue> {
    Ok(match value {
        Value::Null => {
            return Err(Error::type_mismatch("null has no engine representation"))
        }
        Value::Boolean(b) => WireValue::Boolean(*b),
        Value::Integer(i) => WireValue::Integer(*i),
        Value::Float(f) => WireValue::Float(*f),
        Value::String(s) => WireValue::String(s.clone()),
        Value::Binary(b) => WireValue::Binary(b.as_slice().to_vec()),
        Value::Tuple(tuple) => tuple_untyped(tuple)?,
        Value::Relation(relation) => WireValue::Relation(
            relation
                .iter()
                .map(tuple_untyped)
                .collect::<Result<Vec<_>>>()?,
        ),
        Value::Array(array) => {
            let element = array.element_type().cloned().ok_or_else(|| {
                Error::type_mismatch("array without a declared element type")
            })?;
            WireValue::Array {
                elements: array
                    .elements()
                    .iter()
                    .map(to_engine_untyped)
                    .collect::<Result<Vec<_>>>()?,
                element,
            }
        }
        Value::Possrep(object) => {
            if let Some(raw) = object.object_ref() {
                WireValue::Handle(ObjectHandle::new(raw))
            } else {
                let ty = object.scalar_type()?;
                let possrep = ty.possreps().first().cloned().ok_or_else(|| {
                    Error::type_mismatch(format!("type {} has no possreps", ty.name()))
                })?;
                let mut args = Vec::with_capacity(possrep.components().len());
                for component in possrep.components() {
                    args.push(to_engine_untyped(&object.get_property(component.name())?)?);
                }
                WireValue::Selector {
                    type_name: object.type_name(),
                    possrep: possrep.name().to_string(),
                    args,
                }
            }
        }
    })
}

fn tuple_untyped(tuple: &Tuple) -> Result<WireValue> {
    let mut attributes = Vec::with_capacity(tuple.len());
    for (name, value) in tuple.iter() {
        attributes.push((name.to_string(), to_engine_untyped(value)?));
    }
    Ok(WireValue::Tuple(attributes))
}

fn shape_mismatch(value: &Value, expected: &Type) -> Error {
    Error::type_mismatch(format!(
        "{} value where {} expected",
        value.kind(),
        expected
    ))
}
