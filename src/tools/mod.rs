//! Transformations producing a new [`Dataset`](crate::data_structs::Dataset)
//! from an existing one.
//!
//! - [`subset`]: cell selection by condition, batch, cluster or identifier.
//! - [`controls`]: removal of control gene groups.

pub mod controls;
pub mod subset;
