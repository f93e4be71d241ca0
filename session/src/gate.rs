//! The process-wide engine gate.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

/// The mutual-exclusion gate serializing embedded engine access.
///
/// The interpreter resource is process-wide, non-reentrant state: every
/// embedded session shares one gate and holds it for the full duration of
/// each operation, so concurrent calls from different threads block rather
/// than interleave. The gate is an explicit value carried by each session;
/// [`global`](Self::global) returns the process gate, while
/// [`private`](Self::private) builds an isolated gate for tests that fake
/// the engine.
#[derive(Clone)]
pub struct EngineGate {
    lock: Arc<Mutex<()>>,
}

impl EngineGate {
    /// The gate shared by every embedded session in this process.
    pub fn global() -> Self {
        static GATE: OnceLock<EngineGate> = OnceLock::new();
        GATE.get_or_init(EngineGate::private).clone()
    }

    /// An isolated gate serializing only the sessions it is handed to.
    pub fn private() -> Self {
        Self {
            lock: Arc::new(Mutex::new(())),
        }
    }

    pub(crate) fn enter(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
