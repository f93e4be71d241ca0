//! The embedded backend: direct in-process engine access.

use crate::gate::EngineGate;
use crate::proxy::PossrepProxy;
use crate::session::{Materialized, Session};
use log::{debug, warn};
use std::any::Any;
use std::sync::{Arc, Mutex, PoisonError};
use tabula_core::{Error, Possrep, PossrepObject, Result, ScalarType, Value};
use tabula_engine::{HostObject, Interpreter, ObjectHandle};
use tabula_marshal::{to_engine, to_engine_untyped, to_host, HandleBinder};
use tabula_registry::PossrepSource;
use tabula_typeimpl::{setter_name, HostClass};

/// Shared state behind an embedded session and the handles it produces.
struct Inner {
    gate: EngineGate,
    /// The interpreter slot, emptied on close. Only touched with the gate
    /// held.
    interp: Mutex<Option<Box<dyn Interpreter>>>,
}

impl Inner {
    /// Runs one engine call with the gate held for its full duration.
    /// Fails fast once the session is closed.
    fn with_interp<R>(&self, f: impl FnOnce(&mut dyn Interpreter) -> Result<R>) -> Result<R> {
        let _gate = self.gate.enter();
        let mut slot = self.interp.lock().unwrap_or_else(PoisonError::into_inner);
        let interp = slot
            .as_mut()
            .ok_or_else(|| Error::illegal_state("session is closed"))?;
        f(interp.as_mut())
    }
}

/// A session over an in-process interpreter instance.
///
/// Lifecycle is `Open -> Closed` (terminal): [`open`](Self::open)
/// initializes the interpreter, [`close`](Session::close) destroys it, and
/// every operation in between holds the engine gate for its full duration.
pub struct EmbeddedSession {
    inner: Arc<Inner>,
}

impl EmbeddedSession {
    /// Opens a session over an interpreter instance, serialized by the
    /// process-wide gate.
    pub fn open(interp: Box<dyn Interpreter>) -> Result<Self> {
        Self::open_with_gate(interp, EngineGate::global())
    }

    /// Opens a session serialized by a caller-supplied gate. Intended for
    /// tests that fake the engine and must not contend with the process
    /// gate.
    pub fn open_with_gate(mut interp: Box<dyn Interpreter>, gate: EngineGate) -> Result<Self> {
        {
            let _guard = gate.enter();
            interp.init()?;
        }
        debug!("embedded session opened");
        Ok(Self {
            inner: Arc::new(Inner {
                gate,
                interp: Mutex::new(Some(interp)),
            }),
        })
    }

    /// Resolves a scalar type by name through this session's engine, using
    /// the process-wide registry cache.
    pub fn resolve_type(&self, name: &str) -> Result<Option<ScalarType>> {
        tabula_registry::resolve_type(name, self)
    }

    fn binder(&self) -> SessionBinder {
        SessionBinder {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PossrepSource for EmbeddedSession {
    fn type_possreps(&self, name: &str) -> Result<Option<Vec<Possrep>>> {
        self.inner.with_interp(|interp| interp.type_possreps(name))
    }
}

impl Session for EmbeddedSession {
    fn execute(&self, code: &str) -> Result<()> {
        debug!("execute: {}", code);
        self.inner.with_interp(|interp| interp.execute_statement(code))
    }

    fn evaluate(&self, expr: &str) -> Result<Value> {
        debug!("evaluate: {}", expr);
        let wire = self
            .inner
            .with_interp(|interp| interp.evaluate_expression(expr))?;
        // Conversion happens outside the gate; binding a handle re-enters
        // it for the type-name fetch.
        to_host(wire, &self.binder())
    }

    fn evaluate_into(
        &self,
        expr: &str,
        class: &HostClass,
        instance: &mut HostObject,
    ) -> Result<()> {
        let value = self.evaluate(expr)?;
        let kind = value.kind();
        let Value::Possrep(object) = value else {
            return Err(Error::type_mismatch(format!(
                "expression value is {}, which has no possreps",
                kind
            )));
        };
        copy_properties(object.as_ref(), class, instance.as_mut())?;
        object.dispose()
    }

    fn evaluate_as(&self, expr: &str, class: &HostClass) -> Result<Materialized> {
        if class.is_interface() {
            let value = self.evaluate(expr)?;
            let kind = value.kind();
            let Value::Possrep(object) = value else {
                return Err(Error::type_mismatch(format!(
                    "expression value is {}, which has no possreps",
                    kind
                )));
            };
            return Ok(Materialized::Proxy(PossrepProxy::from_class(object, class)));
        }
        let mut instance = class.construct().ok_or_else(|| {
            Error::configuration(format!(
                "class {} has no zero-argument constructor",
                class.name()
            ))
        })?;
        self.evaluate_into(expr, class, &mut instance)?;
        Ok(Materialized::Instance(instance))
    }

    fn set_var(&self, name: &str, value: Value) -> Result<()> {
        debug!("set_var: {}", name);
        // Type resolution, the structural check and the binding call share
        // one gate hold, so nothing can interleave between check and bind.
        self.inner.with_interp(|interp| {
            let ty = interp
                .variable_type(name)?
                .ok_or_else(|| Error::engine(format!("unknown variable {}", name)))?;
            let wire = to_engine(&value, &ty)?;
            interp.set_variable(name, wire)
        })
    }

    fn implement_type(&self, ty: &ScalarType, class: &HostClass) -> Result<()> {
        // Registration issues multiple dependent engine calls; one gate
        // hold makes them atomic to concurrently evaluating threads.
        self.inner
            .with_interp(|interp| tabula_typeimpl::implement_type(interp, ty, class))
    }

    fn close(&self) -> Result<()> {
        let _gate = self.inner.gate.enter();
        let mut slot = self
            .inner
            .interp
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match slot.take() {
            Some(mut interp) => {
                debug!("embedded session closed");
                interp.destroy()
            }
            None => Err(Error::illegal_state("session is already closed")),
        }
    }
}

/// Copies the first possrep's properties of `object` into `instance`
/// through the class's `set<Name>` methods.
fn copy_properties(
    object: &dyn PossrepObject,
    class: &HostClass,
    instance: &mut dyn Any,
) -> Result<()> {
    let ty = object.scalar_type()?;
    let possrep = ty.possreps().first().ok_or_else(|| {
        Error::type_mismatch(format!("type {} has no possreps", ty.name()))
    })?;
    for component in possrep.components() {
        let property = object.get_property(component.name())?;
        let method_name = setter_name(component.name());
        let method = class.method(&method_name).ok_or_else(|| {
            Error::configuration(format!(
                "class {} is missing method {}",
                class.name(),
                method_name
            ))
        })?;
        method.invoke(instance, &[property])?;
    }
    Ok(())
}

/// Wraps interpreter object references into engine-backed handles owned by
/// this session.
struct SessionBinder {
    inner: Arc<Inner>,
}

impl HandleBinder for SessionBinder {
    fn bind_handle(&self, handle: ObjectHandle) -> Result<Value> {
        // The type name is fetched eagerly: identity operations and the
        // nominal check in conversion must not re-enter the gate.
        let type_name = self
            .inner
            .with_interp(|interp| interp.object_type_name(handle))?;
        Ok(Value::Possrep(Arc::new(EnginePossrep {
            handle,
            type_name,
            session: Mutex::new(Some(Arc::clone(&self.inner))),
        })))
    }
}

/// An engine-backed possrep handle: a reference into interpreter-owned
/// storage, tied 1:1 to the session that produced it.
///
/// The handle dies with [`dispose`](PossrepObject::dispose) or with its
/// session; property access on a dead handle fails with `IllegalState`,
/// while disposal stays an unconditional no-op.
pub struct EnginePossrep {
    handle: ObjectHandle,
    type_name: String,
    /// Cleared on dispose. A cleared slot marks the handle dead.
    session: Mutex<Option<Arc<Inner>>>,
}

impl EnginePossrep {
    fn session(&self) -> Result<Arc<Inner>> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
            .ok_or_else(|| Error::illegal_state("possrep handle is disposed"))
    }
}

impl PossrepObject for EnginePossrep {
    fn get_property(&self, name: &str) -> Result<Value> {
        let inner = self.session()?;
        let wire = inner.with_interp(|interp| interp.object_property(self.handle, name))?;
        to_host(wire, &SessionBinder { inner })
    }

    fn set_property(&self, name: &str, value: Value) -> Result<()> {
        let inner = self.session()?;
        let wire = to_engine_untyped(&value)?;
        inner.with_interp(|interp| interp.set_object_property(self.handle, name, wire))
    }

    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn scalar_type(&self) -> Result<ScalarType> {
        let inner = self.session()?;
        let possreps = inner.with_interp(|interp| interp.object_possreps(self.handle))?;
        Ok(ScalarType::new(self.type_name.clone(), possreps))
    }

    fn dispose(&self) -> Result<()> {
        // Unconditionally safe: repeated disposal and disposal after the
        // owning session closed are no-ops; release failures are logged
        // and swallowed.
        let taken = self
            .session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(inner) = taken {
            if let Err(err) = inner.with_interp(|interp| interp.release_object(self.handle)) {
                warn!("releasing object {} failed: {}", self.handle.raw(), err);
            }
        }
        Ok(())
    }

    fn eq_object(&self, other: &dyn PossrepObject) -> bool {
        let Some(other) = other.as_any().downcast_ref::<EnginePossrep>() else {
            return false;
        };
        let (Ok(a), Ok(b)) = (self.session(), other.session()) else {
            return false;
        };
        // Handles never cross sessions.
        if !Arc::ptr_eq(&a, &b) {
            return false;
        }
        a.with_interp(|interp| interp.objects_equal(self.handle, other.handle))
            .unwrap_or(false)
    }

    fn hash_value(&self) -> u64 {
        let Ok(ty) = self.scalar_type() else {
            return 0;
        };
        let Some(possrep) = ty.possreps().first() else {
            return 0;
        };
        possrep.components().iter().fold(0u64, |acc, component| {
            match self.get_property(component.name()) {
                Ok(value) => acc.wrapping_add(value.hash_code()),
                Err(_) => acc,
            }
        })
    }

    fn object_ref(&self) -> Option<u64> {
        self.session
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|_| self.handle.raw())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Drop for EnginePossrep {
    fn drop(&mut self) {
        let _ = self.dispose();
    }
}
