//! The type-implementation algorithm.

use crate::{ConstructorFn, HostClass, HostKind, HostMethod};
use log::debug;
use tabula_core::{Error, Result, ScalarType, Type, Value};
use tabula_engine::{Getter, Interpreter, Selector, Setter, WireValue};
use tabula_marshal::{to_host, NoHandles};

struct ComponentPlan {
    name: String,
    kind: HostKind,
    getter: HostMethod,
    setter: HostMethod,
}

struct PossrepPlan {
    name: String,
    components: Vec<ComponentPlan>,
}

/// Binds a host class to an engine-declared scalar type.
///
/// Every possrep component must be covered by a `get<Name>`/`set<Name>`
/// pair with the exact host kind of the component's engine type. The whole
/// class is validated before the first registration call, so a failed
/// binding leaves no partial engine-side state. The caller holds the
/// engine gate for the duration.
pub fn implement_type(
    interp: &mut dyn Interpreter,
    ty: &ScalarType,
    class: &HostClass,
) -> Result<()> {
    let constructor = class.constructor.clone().ok_or_else(|| {
        Error::configuration(format!(
            "class {} has no zero-argument constructor",
            class.name()
        ))
    })?;

    let plans = ty
        .possreps()
        .iter()
        .map(|possrep| {
            let components = possrep
                .components()
                .iter()
                .map(|component| plan_component(ty, class, component.name(), component.ty()))
                .collect::<Result<Vec<_>>>()?;
            Ok(PossrepPlan {
                name: possrep.name().to_string(),
                components,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    debug!(
        "implementing type {} with class {} ({} possrep(s))",
        ty.name(),
        class.name(),
        plans.len()
    );

    for plan in plans {
        let setters: Vec<HostMethod> = plan.components.iter().map(|c| c.setter.clone()).collect();
        interp.register_selector(ty.name(), &plan.name, build_selector(constructor.clone(), setters))?;

        for (index, component) in plan.components.into_iter().enumerate() {
            let get_op = format!("{}_get_{}", ty.name(), component.name);
            let set_op = format!("{}_set_{}", ty.name(), component.name);
            interp.register_getter(
                &get_op,
                ty.name(),
                &plan.name,
                index,
                build_getter(component.getter, component.kind),
            )?;
            interp.register_setter(
                &set_op,
                ty.name(),
                &plan.name,
                index,
                build_setter(component.setter),
            )?;
        }
    }

    interp.mark_type_implemented(ty.name())
}

fn plan_component(
    ty: &ScalarType,
    class: &HostClass,
    name: &str,
    component_ty: &Type,
) -> Result<ComponentPlan> {
    let kind = HostKind::of(component_ty).ok_or_else(|| {
        Error::configuration(format!(
            "component {} of type {} has no host property mapping",
            name,
            ty.name()
        ))
    })?;

    let getter_name = getter_name(name);
    let getter = match class.method(&getter_name) {
        None => {
            return Err(Error::configuration(format!(
                "class {} is missing method {}",
                class.name(),
                getter_name
            )))
        }
        Some(m) if !m.params().is_empty() || m.returns() != Some(kind) => {
            return Err(Error::configuration(format!(
                "method {}::{} must take no arguments and return {}",
                class.name(),
                getter_name,
                kind
            )))
        }
        Some(m) => m.clone(),
    };

    let setter_name = setter_name(name);
    let setter = match class.method(&setter_name) {
        None => {
            return Err(Error::configuration(format!(
                "class {} is missing method {}",
                class.name(),
                setter_name
            )))
        }
        Some(m) if m.params() != [kind] || m.returns().is_some() => {
            return Err(Error::configuration(format!(
                "method {}::{} must take one {} argument and return nothing",
                class.name(),
                setter_name,
                kind
            )))
        }
        Some(m) => m.clone(),
    };

    Ok(ComponentPlan {
        name: name.to_string(),
        kind,
        getter,
        setter,
    })
}

fn build_selector(constructor: ConstructorFn, setters: Vec<HostMethod>) -> Selector {
    Box::new(move |args: &[WireValue]| {
        if args.len() != setters.len() {
            return Err(Error::engine(format!(
                "selector expected {} arguments, got {}",
                setters.len(),
                args.len()
            )));
        }
        let mut instance = constructor();
        for (setter, arg) in setters.iter().zip(args) {
            let value = to_host(arg.clone(), &NoHandles)?;
            setter.invoke(instance.as_mut(), &[value])?;
        }
        Ok(instance)
    })
}

fn build_getter(method: HostMethod, kind: HostKind) -> Getter {
    Box::new(move |instance| {
        let value = method.invoke(instance, &[])?.ok_or_else(|| {
            Error::engine("component accessor produced no value")
        })?;
        scalar_wire(value, kind)
    })
}

fn build_setter(method: HostMethod) -> Setter {
    Box::new(move |instance, wire| {
        let value = to_host(wire, &NoHandles)?;
        method.invoke(instance, &[value])?;
        Ok(())
    })
}

fn scalar_wire(value: Value, kind: HostKind) -> Result<WireValue> {
    match value {
        Value::Boolean(b) => Ok(WireValue::Boolean(b)),
        Value::Integer(i) => Ok(WireValue::Integer(i)),
        Value::Float(f) => Ok(WireValue::Float(f)),
        Value::String(s) => Ok(WireValue::String(s)),
        other => Err(Error::engine(format!(
            "component accessor produced {} where {} was declared",
            other.kind(),
            kind
        ))),
    }
}

/// The accessor method name for a possrep component: `get<Capitalized>`.
pub fn getter_name(component: &str) -> String {
    format!("get{}", capitalized(component))
}

/// The mutator method name for a possrep component: `set<Capitalized>`.
pub fn setter_name(component: &str) -> String {
    format!("set{}", capitalized(component))
}

fn capitalized(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
