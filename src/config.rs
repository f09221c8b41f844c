//! read configuration from a file or the environment

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::errors::Error;

pub const DEFAULT_REFRESH_URL: &str = "https://smartinvoice.onrender.com/api/v1/refresh";
pub const DEFAULT_USER_AGENT: &str = "auth-status-rust/0.1.0";

pub enum ConfigLocation {
    File(String),
    Env,
}

#[derive(Clone, Debug, serde::Deserialize)]
#[serde(default)]
pub struct Config {
    pub refresh_url: String,
    pub user_agent: String,
    /// Serialize concurrent refreshes behind one in-flight request.
    pub single_flight: bool,
    pub timeout_ms: Option<u64>,
    /// Backing file for the durable slot when using `FileStorage`.
    pub storage_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            refresh_url: DEFAULT_REFRESH_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            single_flight: false,
            timeout_ms: None,
            storage_path: None,
        }
    }
}

impl Config {
    pub fn from_values(
        refresh_url: impl Into<String>,
        single_flight: bool,
        timeout_ms: Option<u64>,
    ) -> Self {
        Self {
            refresh_url: refresh_url.into(),
            single_flight,
            timeout_ms,
            ..Self::default()
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_env() -> Result<Self, Error> {
        let mut config = Config::default();
        if let Ok(url) = std::env::var("AUTH_REFRESH_URL") {
            config.refresh_url = url;
        }
        if let Ok(agent) = std::env::var("AUTH_USER_AGENT") {
            config.user_agent = agent;
        }
        if let Ok(flag) = std::env::var("AUTH_SINGLE_FLIGHT") {
            config.single_flight = parse_bool(&flag).ok_or_else(|| {
                Error::Config(format!("AUTH_SINGLE_FLIGHT must be true/false (got '{flag}')"))
            })?;
        }
        if let Ok(ms) = std::env::var("AUTH_TIMEOUT_MS") {
            let ms = ms
                .parse::<u64>()
                .map_err(|e| Error::Config(format!("AUTH_TIMEOUT_MS is not a number: {e}")))?;
            config.timeout_ms = Some(ms);
        }
        if let Ok(path) = std::env::var("AUTH_STORAGE_PATH") {
            config.storage_path = Some(PathBuf::from(path));
        }
        config.validate()?;
        Ok(config)
    }

    /// Rejects a refresh URL that would fail at request time.
    pub fn validate(&self) -> Result<(), Error> {
        let url = reqwest::Url::parse(&self.refresh_url).map_err(|e| {
            Error::Config(format!("Invalid refresh URL '{}': {}", self.refresh_url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config(format!(
                "Refresh URL must be http(s), got scheme '{}'",
                url.scheme()
            )));
        }
        if self.timeout_ms == Some(0) {
            return Err(Error::Config("timeout_ms must be > 0 when set".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

pub fn read_config(loc: ConfigLocation) -> Result<Config, Error> {
    match loc {
        ConfigLocation::File(path) => Config::from_file(path),
        ConfigLocation::Env => Config::from_env(),
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
