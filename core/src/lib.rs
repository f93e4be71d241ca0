//! Tabula Core Types
//!
//! This crate provides the foundational types used throughout the Tabula
//! client runtime:
//! - the `Value` enum covering every kind of engine value a host program
//!   can observe (scalars, binaries, tuples, relations, arrays, possrep
//!   handles)
//! - container types (`Tuple`, `Relation`, `ArrayValue`, `ByteArray`)
//! - type descriptors (`Type`, `ScalarType`, `TupleType`, `RelationType`,
//!   `ArrayType`, `Possrep`, `NameTypePair`)
//! - the `PossrepObject` trait and its host-native implementation
//! - the common error taxonomy

mod error;
mod possrep;
mod tuple;
mod types;
mod value;

pub use error::*;
pub use possrep::*;
pub use tuple::*;
pub use types::*;
pub use value::*;
