use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Browser operation failed: {message}")]
    BrowserError { message: String },

    #[error("Page {url} did not reach network idle within {timeout_secs}s")]
    NetworkIdleTimeout { url: String, timeout_secs: u64 },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field}: {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::BrowserError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Browser,
    Export,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScrapeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ScrapeError::BrowserError { .. } | ScrapeError::NetworkIdleTimeout { .. } => {
                ErrorCategory::Browser
            }
            ScrapeError::CsvError(_)
            | ScrapeError::IoError(_)
            | ScrapeError::SerializationError(_) => ErrorCategory::Export,
            ScrapeError::ConfigError { .. }
            | ScrapeError::InvalidConfigValueError { .. }
            | ScrapeError::MissingConfigError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Browser => match self {
                ScrapeError::NetworkIdleTimeout { .. } => ErrorSeverity::Medium,
                _ => ErrorSeverity::Critical,
            },
            ErrorCategory::Export => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScrapeError::BrowserError { .. } => {
                "Check that Chrome/Chromium is installed and can be launched"
            }
            ScrapeError::NetworkIdleTimeout { .. } => {
                "The page kept loading; raise browser.network_idle_timeout_secs or check the network"
            }
            ScrapeError::CsvError(_) | ScrapeError::IoError(_) => {
                "Check that the output directory exists and is writable"
            }
            ScrapeError::SerializationError(_) => {
                "The scraped data could not be serialized; rerun with --verbose for details"
            }
            ScrapeError::ConfigError { .. }
            | ScrapeError::InvalidConfigValueError { .. }
            | ScrapeError::MissingConfigError { .. } => {
                "Fix the configuration file or command line flags"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Browser => format!("瀏覽器操作失敗: {}", self),
            ErrorCategory::Export => format!("輸出檔案失敗: {}", self),
            ErrorCategory::Configuration => format!("配置錯誤: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_by_category() {
        let timeout = ScrapeError::NetworkIdleTimeout {
            url: "https://2gis.kz".to_string(),
            timeout_secs: 30,
        };
        assert_eq!(timeout.category(), ErrorCategory::Browser);
        assert_eq!(timeout.severity(), ErrorSeverity::Medium);

        let browser = ScrapeError::BrowserError {
            message: "launch failed".to_string(),
        };
        assert_eq!(browser.severity(), ErrorSeverity::Critical);

        let config = ScrapeError::MissingConfigError {
            field: "scraper.urls".to_string(),
        };
        assert_eq!(config.category(), ErrorCategory::Configuration);
        assert!(config.user_friendly_message().contains("scraper.urls"));
    }

    #[test]
    fn test_export_write_failures_are_io_errors() {
        // the XML writer reports failures through std::io
        let err: ScrapeError = std::io::Error::other("disk full").into();
        assert!(matches!(err, ScrapeError::IoError(_)));
        assert_eq!(err.category(), ErrorCategory::Export);
        assert_eq!(err.severity(), ErrorSeverity::High);
    }
}
