//! The scalar type cache.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use tabula_core::{Possrep, Result, ScalarType};

/// Answers possrep queries for named types, typically by asking the engine
/// behind an open session.
pub trait PossrepSource {
    /// The possreps of the named type, or `None` if the source knows no
    /// such type.
    fn type_possreps(&self, name: &str) -> Result<Option<Vec<Possrep>>>;
}

fn cache() -> &'static Mutex<HashMap<String, ScalarType>> {
    static CACHE: OnceLock<Mutex<HashMap<String, ScalarType>>> = OnceLock::new();
    CACHE.get_or_init(|| {
        let mut seeded = HashMap::new();
        for ty in [
            ScalarType::boolean(),
            ScalarType::integer(),
            ScalarType::string(),
            ScalarType::float(),
            ScalarType::binary(),
        ] {
            seeded.insert(ty.name().to_string(), ty);
        }
        Mutex::new(seeded)
    })
}

/// Resolves a scalar type by name.
///
/// Built-in names resolve without consulting the source. Other names are
/// looked up through the source once and cached append-only, since a
/// scalar type's definition is immutable for the lifetime of an engine
/// instance. `Ok(None)` means the source reports no such type, which is
/// distinct from a source failure: callers may fall back to a purely
/// host-defined representation on `None`.
pub fn resolve_type(name: &str, source: &dyn PossrepSource) -> Result<Option<ScalarType>> {
    if let Some(found) = lookup(name) {
        return Ok(Some(found));
    }
    let Some(possreps) = source.type_possreps(name)? else {
        return Ok(None);
    };
    let ty = ScalarType::new(name, possreps);
    let mut map = cache().lock().unwrap_or_else(PoisonError::into_inner);
    // A concurrent resolve may have won the race; the first entry stays.
    Ok(Some(map.entry(name.to_string()).or_insert(ty).clone()))
}

/// Resolves a built-in or previously cached type without a source.
pub fn lookup(name: &str) -> Option<ScalarType> {
    cache()
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .get(name)
        .cloned()
}
