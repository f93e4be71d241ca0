//! Bidirectional conversion between engine wire values and host values.
//!
//! [`to_host`] turns a [`tabula_engine::WireValue`] into a
//! [`tabula_core::Value`], discarding engine-incidental detail (tuple
//! attribute order, relation duplicates). [`to_engine`] goes the other way
//! under the strict structural check: the shape of the host value must
//! match the declared engine type exactly before anything is sent.

mod decode;
mod encode;

pub use decode::*;
pub use encode::*;
