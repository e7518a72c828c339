//! MedFinder-RS: A multi-source nearby-hospital discovery service written in Rust
//!
//! Given an anchor coordinate, MedFinder queries several geodata providers
//! concurrently, merges their results into one canonical record list, and
//! returns the records ranked by great-circle distance. Merged results are
//! memoized in a single-slot cache bounded by both age and anchor movement.

pub mod cache;
pub mod config;
pub mod discovery;
pub mod geo;
pub mod location;
pub mod metrics;
pub mod network;
pub mod providers;
pub mod results;
pub mod web;

pub use config::Settings;
pub use discovery::{Discovery, DiscoveryOutcome, DiscoveryRequest};
pub use geo::Coordinate;
pub use providers::Provider;
pub use results::HospitalRecord;

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default timeout for provider requests in seconds
pub const DEFAULT_TIMEOUT: u64 = 10;

/// Maximum timeout that can be set
pub const MAX_TIMEOUT: u64 = 30;
