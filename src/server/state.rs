//! Server state and configuration.

use crate::api::HomeboxClient;
use crate::label::LabelPattern;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Homebox base URL
    pub base_url: String,
    /// Homebox account username
    pub username: String,
    /// Homebox account password
    pub password: String,
    /// Two-group identifier pattern applied to record names
    pub id_pattern: String,
    /// Zero-padding width for parsed identifier numbers
    pub pad_width: usize,
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    /// Authenticated Homebox client, created once at startup.
    pub client: HomeboxClient,
    /// Compiled identifier pattern, shared by every request.
    pub pattern: LabelPattern,
}

impl AppState {
    pub fn new(config: ServerConfig, client: HomeboxClient, pattern: LabelPattern) -> Self {
        Self {
            config,
            client,
            pattern,
        }
    }
}
