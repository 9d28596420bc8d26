use std::collections::HashMap;
use std::env;
use std::fs::File;
use std::io::Read;
use std::time::Duration;

use tracing::{debug, warn};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_SCORING_URL: &str = "http://localhost:5000";
pub const DEFAULT_SCORING_TIMEOUT_MS: u64 = 10_000;

/// Static relay settings, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the scoring service, without a trailing slash.
    pub scoring_url: String,
    pub scoring_timeout_ms: u64,
}

pub const ENV_FILE: &str = ".env";

impl RelayConfig {
    /// Process environment, falling back to `.env` in the working directory when present.
    pub fn load() -> Self {
        match File::open(ENV_FILE) {
            Ok(file) => {
                debug!(path = ENV_FILE, "reading environment file");
                Self::from_dotenv(file)
            }
            Err(_) => Self::from_env(),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Process variables take precedence over entries read from `reader`.
    pub fn from_dotenv<R: Read>(reader: R) -> Self {
        Self::from_dotenv_over(reader, |key| env::var(key).ok())
    }

    fn from_dotenv_over<R, F>(reader: R, process: F) -> Self
    where
        R: Read,
        F: Fn(&str) -> Option<String>,
    {
        let mut file = HashMap::new();
        for entry in dotenvy::from_read_iter(reader) {
            match entry {
                Ok((key, value)) => {
                    file.insert(key, value);
                }
                Err(err) => warn!(error = %err, "skipping malformed environment file entry"),
            }
        }
        Self::from_lookup(|key| process(key).or_else(|| file.get(key).cloned()))
    }

    /// Builds the config from an arbitrary key lookup. Unparseable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST")
            .filter(|value| !value.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_HOST.to_string());

        let port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);

        let scoring_url = lookup("PYTHON_API_URL")
            .map(|value| value.trim().trim_end_matches('/').to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_SCORING_URL.to_string());

        let scoring_timeout_ms = lookup("SCORING_TIMEOUT_MS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_SCORING_TIMEOUT_MS);

        Self {
            host,
            port,
            scoring_url,
            scoring_timeout_ms,
        }
    }

    pub fn scoring_timeout(&self) -> Duration {
        Duration::from_millis(self.scoring_timeout_ms)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
