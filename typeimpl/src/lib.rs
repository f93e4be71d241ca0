//! Capability-checked binding of host classes to engine-declared scalar
//! types.
//!
//! A [`HostClass`] is an explicit registration table standing in for
//! reflection: a name, an optional zero-argument constructor, and methods
//! with declared signatures. [`implement_type`] verifies the class covers
//! every possrep component of a type (exact names, exact host kinds), then
//! registers the selector and accessor trampolines with the engine.

mod class;
mod implement;

pub use class::*;
pub use implement::*;
