use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8085;
pub const DEFAULT_STATIC_DIR: &str = "static";
pub const DEFAULT_STATISTICS_URL: &str = "http://127.0.0.1:5000/statistics";
pub const DEFAULT_MAPS_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("PORT {0:?} is not a port number")]
    InvalidPort(String),
}

/// Settings read from the environment
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `PORT`
    pub port: u16,
    /// `STATIC_DIR`, assets of the page
    pub static_dir: PathBuf,
    /// `STATISTICS_URL`
    pub statistics_url: String,
    /// `MAPS_API_KEY`, required
    pub maps_api_key: String,
    /// `MAPS_BASE_URL`
    pub maps_base_url: String,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let port = match lookup("PORT") {
            Some(port) => port.parse().map_err(|_| ConfigError::InvalidPort(port))?,
            None => DEFAULT_PORT,
        };
        Ok(Config {
            port,
            static_dir: lookup("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_owned())
                .into(),
            statistics_url: lookup("STATISTICS_URL")
                .unwrap_or_else(|| DEFAULT_STATISTICS_URL.to_owned()),
            maps_api_key: lookup("MAPS_API_KEY")
                .filter(|key| !key.is_empty())
                .ok_or(ConfigError::Missing("MAPS_API_KEY"))?,
            maps_base_url: lookup("MAPS_BASE_URL")
                .unwrap_or_else(|| DEFAULT_MAPS_BASE_URL.to_owned()),
        })
    }
}
