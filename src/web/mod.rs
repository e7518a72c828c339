//! Web server module
//!
//! Provides the JSON HTTP API for MedFinder-RS.

mod handlers;
mod routes;
mod state;

pub use routes::create_router;
pub use state::AppState;
