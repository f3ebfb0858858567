use std::env;

pub const DEFAULT_PWHOIS_SERVER: &str = "whois.pwhois.org";
pub const DEFAULT_PWHOIS_PORT: u16 = 43;
pub const DEFAULT_BATCH_MAX_SIZE: usize = 500;

/// Environment variable consulted by the CLI when no `--server` is given
pub const PWHOIS_SERVER_ENV: &str = "PWHOIS_SERVER";

/// Endpoint and limits for one lookup session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    max_batch_size: usize,
}

impl ServerConfig {
    /// Build a config, replacing an empty host or a zero port/batch size
    /// with the documented defaults.
    pub fn new(host: impl Into<String>, port: u16, max_batch_size: usize) -> Self {
        let host = host.into();
        let host = if host.trim().is_empty() {
            DEFAULT_PWHOIS_SERVER.to_string()
        } else {
            host
        };

        Self {
            host,
            port: if port == 0 { DEFAULT_PWHOIS_PORT } else { port },
            max_batch_size: if max_batch_size == 0 {
                DEFAULT_BATCH_MAX_SIZE
            } else {
                max_batch_size
            },
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn max_batch_size(&self) -> usize {
        self.max_batch_size
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get server host from environment variable if available
    pub fn host_from_env() -> Option<String> {
        env::var(PWHOIS_SERVER_ENV).ok().filter(|h| !h.trim().is_empty())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PWHOIS_SERVER, DEFAULT_PWHOIS_PORT, DEFAULT_BATCH_MAX_SIZE)
    }
}
