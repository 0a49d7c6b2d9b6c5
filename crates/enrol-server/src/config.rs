//! Runtime configuration.

use std::net::SocketAddr;
use std::time::Duration;

use enrol_client::Endpoints;
use enrol_forms::Locale;

use crate::request::DEFAULT_BODY_LIMIT;

/// Default listen address.
pub const DEFAULT_LISTEN: &str = "127.0.0.1:3000";

/// Settings for one server instance.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Remote department and user endpoints.
    pub endpoints: Endpoints,
    /// Interface language.
    pub locale: Locale,
    /// How long the success banner stays up.
    pub banner_duration: Duration,
    /// Connect and request timeout for remote calls.
    pub request_timeout: Duration,
    /// Sessions unused for this long are dropped.
    pub session_idle_timeout: Duration,
    /// Most sessions kept at once; the longest idle one is evicted first.
    pub max_sessions: usize,
    /// Largest accepted request body, in bytes.
    pub max_body_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 3000)),
            endpoints: Endpoints::default(),
            locale: Locale::default(),
            banner_duration: Duration::from_secs(3),
            request_timeout: Duration::from_secs(10),
            session_idle_timeout: Duration::from_secs(30 * 60),
            max_sessions: 10_000,
            max_body_bytes: DEFAULT_BODY_LIMIT,
        }
    }
}
