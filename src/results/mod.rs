//! Canonical hospital records, merge container, and distance ranking
//!
//! This module defines the record structures shared by providers, the cache,
//! and the web layer.

mod container;
pub mod rank;
mod types;

pub use container::ResultSet;
pub use types::*;
