//! Server configuration.
//!
//! Every field has a default, so an empty (or absent) TOML file is a valid
//! configuration. Command-line flags are applied on top by the binary.
//!
//! ```toml
//! addr = "localhost:9999"
//! cert_file = "cert.crt"
//! key_file = "cert.key"
//! max_connections = 1024
//! request_timeout_secs = 10
//! hosts = ["example.org"]
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::Error;

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// `host:port` to listen on.
    pub addr: String,
    /// PEM certificate chain.
    pub cert_file: PathBuf,
    /// PEM private key.
    pub key_file: PathBuf,
    pub max_connections: usize,
    pub request_timeout_secs: u64,
    /// Hosts answered for; empty accepts any.
    pub hosts: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            addr: "localhost:9999".to_owned(),
            cert_file: PathBuf::from("cert.crt"),
            key_file: PathBuf::from("cert.key"),
            max_connections: 1024,
            request_timeout_secs: 10,
            hosts: Vec::new(),
        }
    }
}

impl Config {
    /// Loads and validates a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|source| Error::Read { path: path.to_owned(), source })?;
        let config: Self = toml::from_str(&content)
            .map_err(|source| Error::ConfigParse { path: path.to_owned(), source })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.addr.trim().is_empty() {
            return Err(Error::InvalidConfig("addr must not be empty".into()));
        }
        if self.max_connections == 0 {
            return Err(Error::InvalidConfig("max_connections must be greater than 0".into()));
        }
        if self.request_timeout_secs == 0 {
            return Err(Error::InvalidConfig("request_timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
