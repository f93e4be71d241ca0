//! Possrep-typed values ("scalar handles").
//!
//! A value of a scalar type with possible representations is exposed as an
//! object with one property per possrep component. Two kinds exist: the
//! host-native handle defined here, and the engine-backed handle the
//! embedded session produces (a reference into interpreter-owned storage).

use crate::{Error, Result, ScalarType, Value};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// A value of a scalar type with possible representations.
pub trait PossrepObject: Send + Sync {
    /// Reads a property value.
    fn get_property(&self, name: &str) -> Result<Value>;

    /// Writes a property value.
    fn set_property(&self, name: &str, value: Value) -> Result<()>;

    /// The type name.
    fn type_name(&self) -> String;

    /// The full scalar type. Engine-backed handles load it lazily.
    fn scalar_type(&self) -> Result<ScalarType>;

    /// Releases any engine-side resource tied to this value. Safe to call
    /// any number of times, including after the owning session is closed.
    fn dispose(&self) -> Result<()>;

    /// Structural equality with another handle. Handles of different
    /// kinds, or owned by different sessions, compare unequal.
    fn eq_object(&self, other: &dyn PossrepObject) -> bool;

    /// A hash derived from the component values of the first possrep.
    fn hash_value(&self) -> u64;

    /// The raw reference into interpreter-owned storage, for engine-backed
    /// handles that are still live. Host-native values have none.
    fn object_ref(&self) -> Option<u64> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

/// Shared handle to a possrep-typed value.
pub type PossrepRef = Arc<dyn PossrepObject>;

/// A host-native possrep value: a pure host-side property map with no
/// engine-side resource.
///
/// Used to build a value to send to the engine, and to carry payloads
/// decoded from the remote backend.
#[derive(Debug)]
pub struct NativePossrep {
    ty: ScalarType,
    properties: Mutex<HashMap<String, Value>>,
}

impl NativePossrep {
    /// A native value of the named type, with no possrep information.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self::with_type(ScalarType::new(type_name, Vec::new()))
    }

    /// A native value of a fully described scalar type.
    pub fn with_type(ty: ScalarType) -> Self {
        Self {
            ty,
            properties: Mutex::new(HashMap::new()),
        }
    }

    /// Builder form for seeding properties.
    pub fn with_property(self, name: impl Into<String>, value: Value) -> Self {
        self.props().insert(name.into(), value);
        self
    }

    pub fn property_names(&self) -> Vec<String> {
        self.props().keys().cloned().collect()
    }

    fn props(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.properties.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PossrepObject for NativePossrep {
    fn get_property(&self, name: &str) -> Result<Value> {
        self.props().get(name).cloned().ok_or_else(|| {
            Error::type_mismatch(format!(
                "no property `{}` on value of type {}",
                name,
                self.ty.name()
            ))
        })
    }

    fn set_property(&self, name: &str, value: Value) -> Result<()> {
        self.props().insert(name.to_string(), value);
        Ok(())
    }

    fn type_name(&self) -> String {
        self.ty.name().to_string()
    }

    fn scalar_type(&self) -> Result<ScalarType> {
        Ok(self.ty.clone())
    }

    fn dispose(&self) -> Result<()> {
        Ok(())
    }

    fn eq_object(&self, other: &dyn PossrepObject) -> bool {
        let Some(other) = other.as_any().downcast_ref::<NativePossrep>() else {
            return false;
        };
        if self.ty != other.ty {
            return false;
        }
        let mine = self.props().clone();
        let theirs = other.props().clone();
        mine == theirs
    }

    fn hash_value(&self) -> u64 {
        self.props()
            .values()
            .fold(0u64, |acc, v| acc.wrapping_add(v.hash_code()))
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Display for NativePossrep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty.name())
    }
}
