use crate::{
    error::{IllustError, Result},
    logger::{LogLevel, LoggerConfig},
};
use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_SIZE: &str = "square_medium";

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// `None` means requests run until the backend answers or the connection drops.
    pub request_timeout: Option<Duration>,
    pub default_size: String,
    pub log_level: LogLevel,
    pub log_json: bool,
    pub log_file: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            default_size: DEFAULT_SIZE.to_string(),
            log_level: LogLevel::Info,
            log_json: false,
            log_file: None,
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let defaults = Self::default();

        let base_url = env::var("ILLUSTGEN_API_URL").unwrap_or(defaults.base_url);
        let request_timeout = env::var("ILLUSTGEN_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs);
        let default_size = env::var("ILLUSTGEN_DEFAULT_SIZE").unwrap_or(defaults.default_size);
        let log_level = env::var("ILLUSTGEN_LOG_LEVEL")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.log_level);
        let log_json = env::var("ILLUSTGEN_LOG_JSON")
            .ok()
            .map_or(false, |val| val == "true");
        let log_file = env::var("ILLUSTGEN_LOG_FILE").ok().filter(|s| !s.is_empty());

        ClientConfig {
            base_url,
            request_timeout,
            default_size,
            log_level,
            log_json,
            log_file,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn with_default_size(mut self, size: impl Into<String>) -> Self {
        self.default_size = size.into();
        self
    }

    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(IllustError::Config("API base URL is empty".into()));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(IllustError::Config(format!(
                "API base URL must start with http:// or https://, got {}",
                url
            )));
        }
        if self.default_size.trim().is_empty() {
            return Err(IllustError::Config("default size is empty".into()));
        }
        Ok(())
    }

    /// Logger settings derived from this config. Logs go to stderr; the form owns stdout.
    pub fn logger_config(&self) -> LoggerConfig {
        let mut config = if self.log_json {
            LoggerConfig::production()
        } else {
            LoggerConfig::development()
        }
        .with_level(self.log_level);

        config.log_to_file = false;
        if let Some(path) = &self.log_file {
            config = config.with_file_output(path);
        }
        config
    }
}
