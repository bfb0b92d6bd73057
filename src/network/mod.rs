//! Canonical network representation.
//!
//! This module provides the series/parallel transistor tree that every other
//! pass consumes. A [`NetworkNode`] is a closed tagged union, so adding a
//! node kind is a compile-time-checked change in the layout engine and the
//! composition engine.

mod canonical;
mod count;
mod types;

#[cfg(test)]
pub(crate) mod strategy;

pub use canonical::{from_json, from_value};
pub use count::{TransistorCount, INVERTER_TRANSISTORS};
pub use types::*;
