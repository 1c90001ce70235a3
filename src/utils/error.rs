use thiserror::Error;

#[derive(Error, Debug)]
pub enum TallyError {
    #[error("Transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Tally returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Tally rejected the request: {message}")]
    Application { message: String },

    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

/// 錯誤分類，讓呼叫端不必比對字串就能分辨失敗原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Transport,
    Protocol,
    Application,
    MalformedResponse,
    CallerInput,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TallyError {
    pub fn application(message: impl Into<String>) -> Self {
        TallyError::Application {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        TallyError::MalformedResponse {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        TallyError::InvalidInput {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TallyError::Transport(_) => ErrorCategory::Transport,
            TallyError::HttpStatus { .. } => ErrorCategory::Protocol,
            TallyError::Application { .. } => ErrorCategory::Application,
            TallyError::MalformedResponse { .. } => ErrorCategory::MalformedResponse,
            TallyError::InvalidInput { .. } => ErrorCategory::CallerInput,
            TallyError::ConfigError { .. }
            | TallyError::ConfigValidationError { .. }
            | TallyError::InvalidConfigValueError { .. }
            | TallyError::MissingConfigError { .. } => ErrorCategory::Configuration,
            TallyError::IoError(_) | TallyError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Transport => ErrorSeverity::Medium,
            ErrorCategory::Protocol | ErrorCategory::MalformedResponse => ErrorSeverity::High,
            ErrorCategory::Application | ErrorCategory::CallerInput => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 連線層失敗與 5xx 可以重試，其餘重試也不會有不同結果
    pub fn is_retryable(&self) -> bool {
        match self {
            TallyError::Transport(e) => e.is_timeout() || e.is_connect(),
            TallyError::HttpStatus { status } => *status >= 500,
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, TallyError::Transport(e) if e.is_timeout())
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            TallyError::Transport(e) if e.is_timeout() => {
                "Tally did not answer before the timeout expired".to_string()
            }
            TallyError::Transport(e) if e.is_connect() => {
                "Could not connect to the Tally server".to_string()
            }
            TallyError::Transport(e) => format!("Network error while talking to Tally: {}", e),
            TallyError::HttpStatus { status } => format!("Tally answered with HTTP {}", status),
            TallyError::Application { message } => format!("Tally reported an error: {}", message),
            TallyError::MalformedResponse { .. } => {
                "Tally returned a response that could not be parsed".to_string()
            }
            TallyError::InvalidInput { message } => format!("Invalid request: {}", message),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Transport => {
                "Make sure Tally is running with its HTTP server enabled on the configured port"
            }
            ErrorCategory::Protocol => "Check that the endpoint points at Tally and not another service",
            ErrorCategory::Application => {
                "Verify the company is loaded in Tally and the referenced masters exist"
            }
            ErrorCategory::MalformedResponse => "Retry with --verbose to inspect the raw response",
            ErrorCategory::CallerInput => "Supply at least one field to change and re-run",
            ErrorCategory::Configuration => "Fix the configuration file or command-line flags",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_and_severity() {
        let err = TallyError::HttpStatus { status: 404 };
        assert_eq!(err.category(), ErrorCategory::Protocol);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(!err.is_retryable());

        let err = TallyError::HttpStatus { status: 503 };
        assert!(err.is_retryable());

        let err = TallyError::invalid_input("nothing to update");
        assert_eq!(err.category(), ErrorCategory::CallerInput);
        assert!(err.to_string().contains("nothing to update"));

        let err = TallyError::MissingConfigError {
            field: "tally.host".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_user_friendly_message_embeds_status() {
        let err = TallyError::HttpStatus { status: 500 };
        assert_eq!(err.user_friendly_message(), "Tally answered with HTTP 500");
        assert_eq!(err.to_string(), "Tally returned HTTP 500");
    }
}
