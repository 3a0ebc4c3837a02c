//! Client configuration.
//!
//! Use the builder methods to customize, or [`ChatConfig::from_env`] to read
//! the `TUTORCHAT_*` environment variables.
//!
//! ```ignore
//! use tutorchat::config::ChatConfig;
//!
//! let config = ChatConfig::default()
//!     .with_base_url("http://localhost:9000")
//!     .with_streaming(false);
//! ```

use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_READ_TIMEOUT_SECS: u64 = 60;

pub const STREAM_CHAT_PATH: &str = "/chat/stream";
pub const CHAT_PATH: &str = "/chat";
pub const CURRENT_PROBLEM_PATH: &str = "/problems/current";

const ENV_BASE_URL: &str = "TUTORCHAT_BASE_URL";
const ENV_TOKEN: &str = "TUTORCHAT_TOKEN";
const ENV_STREAMING: &str = "TUTORCHAT_STREAMING";
const ENV_CONNECT_TIMEOUT: &str = "TUTORCHAT_CONNECT_TIMEOUT_SECS";
const ENV_READ_TIMEOUT: &str = "TUTORCHAT_READ_TIMEOUT_SECS";

#[derive(Debug, Clone, PartialEq)]
pub struct ChatConfig {
    /// Assistant server root, without trailing slash.
    pub base_url: String,
    /// Use the streaming endpoint (default) or the buffered one.
    pub streaming: bool,
    /// Token to sign in with at startup.
    pub auth_token: Option<String>,
    /// TCP connect timeout.
    pub connect_timeout: Duration,
    /// Longest wait for the next chunk of a streaming body. There is no
    /// total limit on how long a reply may take.
    pub read_timeout: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            streaming: true,
            auth_token: None,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            read_timeout: Duration::from_secs(DEFAULT_READ_TIMEOUT_SECS),
        }
    }
}

impl ChatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_streaming(mut self, streaming: bool) -> Self {
        self.streaming = streaming;
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Build config from `TUTORCHAT_*` environment variables.
    ///
    /// Unset or unparsable values keep their defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.trim().is_empty() {
                config = config.with_base_url(url.trim());
            }
        }
        if let Ok(token) = std::env::var(ENV_TOKEN) {
            if !token.trim().is_empty() {
                config = config.with_auth_token(token.trim());
            }
        }
        if let Ok(value) = std::env::var(ENV_STREAMING) {
            config.streaming = !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "no" | "off"
            );
        }
        if let Ok(value) = std::env::var(ENV_CONNECT_TIMEOUT) {
            match value.trim().parse::<u64>() {
                Ok(secs) => config.connect_timeout = Duration::from_secs(secs),
                Err(_) => tracing::warn!(value = %value, "ignoring invalid {}", ENV_CONNECT_TIMEOUT),
            }
        }
        if let Ok(value) = std::env::var(ENV_READ_TIMEOUT) {
            match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.read_timeout = Duration::from_secs(secs),
                _ => tracing::warn!(value = %value, "ignoring invalid {}", ENV_READ_TIMEOUT),
            }
        }

        config
    }

    pub fn stream_url(&self) -> String {
        format!("{}{}", self.base_url, STREAM_CHAT_PATH)
    }

    pub fn chat_url(&self) -> String {
        format!("{}{}", self.base_url, CHAT_PATH)
    }

    pub fn problem_url(&self) -> String {
        format!("{}{}", self.base_url, CURRENT_PROBLEM_PATH)
    }
}
