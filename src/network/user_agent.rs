//! User agent and default header values
//!
//! The geodata APIs this service talks to (Overpass in particular) ask
//! clients to identify themselves, so the default agent names the service
//! and version rather than imitating a browser.

/// Default user agent string for outgoing requests
pub fn default_user_agent() -> String {
    format!(
        "medfinder-rs/{} (+https://github.com/medfinder/medfinder-rs)",
        crate::VERSION
    )
}

/// Standard accept header for JSON API requests
pub fn accept_json() -> &'static str {
    "application/json,text/javascript,*/*;q=0.01"
}
