//! Server configuration
//!
//! Loaded from `ZAMUNDA_`-prefixed environment variables over built-in
//! defaults; there is no config file and no process-global state.

use figment::providers::{Env, Serialized};
use figment::Figment;
use serde::{Deserialize, Serialize};

use zamunda_core::ClientConfig;

/// Configuration for the API server and its upstream client
///
/// Every field maps to one environment variable, e.g.
/// `ZAMUNDA_PORT=9000` or `ZAMUNDA_UPSTREAM_BASE_URL=http://localhost:8080`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Base URL of the tracker the scraper talks to
    pub upstream_base_url: String,
    /// Per-request timeout towards the tracker, in seconds
    pub request_timeout_secs: u64,
    /// Connection retries after the first attempt
    pub max_retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            upstream_base_url: "https://zamunda.net".to_string(),
            request_timeout_secs: 10,
            max_retries: 4,
        }
    }
}

impl ServerConfig {
    /// Client configuration for one scraper instance
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.upstream_base_url.clone(),
            timeout_secs: self.request_timeout_secs,
            max_retries: self.max_retries,
            ..ClientConfig::default()
        }
    }

    /// Socket address string for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Load configuration from the environment over the defaults
pub fn load_config() -> Result<ServerConfig, figment::Error> {
    Figment::from(Serialized::defaults(ServerConfig::default()))
        .merge(Env::prefixed("ZAMUNDA_"))
        .extract()
}
