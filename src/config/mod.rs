#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_port, validate_range, validate_url, Validate};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_HOST: &str = "http://localhost";
pub const DEFAULT_PORT: u16 = 9000;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 25;
pub const MIN_TIMEOUT_SECONDS: u64 = 1;
pub const MAX_TIMEOUT_SECONDS: u64 = 600;

/// Tally 連線設定
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    pub timeout_seconds: u64,
    /// 在 debug 日誌中輸出完整的請求/回應內容
    pub log_payloads: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            log_payloads: false,
        }
    }
}

impl ClientConfig {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    pub fn with_payload_logging(mut self, enabled: bool) -> Self {
        self.log_payloads = enabled;
        self
    }

    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

impl ConfigProvider for ClientConfig {
    fn endpoint(&self) -> String {
        ClientConfig::endpoint(self)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn log_payloads(&self) -> bool {
        self.log_payloads
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validate_url("tally.host", &self.host)?;
        validate_port("tally.port", self.port)?;
        validate_range(
            "tally.timeout_seconds",
            self.timeout_seconds,
            MIN_TIMEOUT_SECONDS,
            MAX_TIMEOUT_SECONDS,
        )?;
        Ok(())
    }
}
