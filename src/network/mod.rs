//! HTTP networking module
//!
//! Provides HTTP client functionality for making requests to geodata
//! providers and the IP geolocation endpoint.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::default_user_agent;
