//! Process-wide scalar type registry.
//!
//! Maps type names to descriptors: seeded with the built-in scalar types,
//! lazily extended by querying an engine for user-defined types, cached
//! append-only for the lifetime of the process.

mod registry;

pub use registry::*;
