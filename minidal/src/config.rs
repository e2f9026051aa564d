//! Connection settings for the network backends

use serde::Deserialize;
use std::time::Duration;

/// Where and how to connect to a MySQL or PostgreSQL server
///
/// Deserializable so callers can load it from whatever source they use;
/// missing fields take the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ConnectionConfig {
    pub host: String,
    /// Server port; `None` uses the driver's default for the backend
    pub port: Option<u16>,
    pub user: String,
    pub password: Option<String>,
    pub database: String,
    /// Pool size. One connection per executor unless raised.
    pub max_connections: u32,
    /// Seconds to wait for a free connection before failing
    pub acquire_timeout_secs: u64,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: None,
            user: "root".to_string(),
            password: None,
            database: String::new(),
            max_connections: 1,
            acquire_timeout_secs: 30,
        }
    }
}

impl ConnectionConfig {
    pub fn new(host: impl Into<String>, user: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }
}
