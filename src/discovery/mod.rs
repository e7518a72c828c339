//! Discovery orchestration module
//!
//! Coordinates the full flow: cache check, concurrent provider fan-out,
//! merge, cache store, and distance ranking.

mod executor;
mod models;
mod presenter;

pub use executor::Discovery;
pub use models::{DiscoveryError, DiscoveryOutcome, DiscoveryRequest};
pub use presenter::{LogMarkerSink, MarkerSink};
