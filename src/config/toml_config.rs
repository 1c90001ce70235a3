use crate::config::ClientConfig;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, TallyError};
use crate::utils::validation::{validate_non_empty_string, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;
use std::time::Duration;

/// 設定檔格式：
///
/// ```toml
/// [tally]
/// host = "http://localhost"
/// port = 9000
/// timeout_seconds = 25
///
/// [defaults]
/// company = "${TALLY_COMPANY}"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub tally: ClientConfig,
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub company: Option<String>,
}

fn env_var_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"))
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TallyError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| TallyError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TALLY_HOST})；未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        env_var_pattern()
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn client_config(&self) -> &ClientConfig {
        &self.tally
    }

    pub fn company(&self) -> Option<&str> {
        self.defaults.as_ref().and_then(|d| d.company.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn endpoint(&self) -> String {
        self.tally.endpoint()
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.tally.timeout_seconds)
    }

    fn log_payloads(&self) -> bool {
        self.tally.log_payloads
    }

    fn default_company(&self) -> Option<&str> {
        self.company()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.tally.validate()?;
        if let Some(company) = self.company() {
            validate_non_empty_string("defaults.company", company)?;
            if company.contains("${") {
                return Err(TallyError::InvalidConfigValueError {
                    field: "defaults.company".to_string(),
                    value: company.to_string(),
                    reason: "environment variable is not set".to_string(),
                });
            }
        }
        Ok(())
    }
}
