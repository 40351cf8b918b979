use crate::config::selectors::SelectorProfile;
use crate::config::DEFAULT_URLS;
use crate::core::dates::UnknownMonthPolicy;
use crate::core::loader::StabilizeOptions;
use crate::domain::ports::{ConfigProvider, ResponseFilter};
use crate::utils::error::{Result, ScrapeError};
use crate::utils::validation::{
    validate_json_pointer, validate_non_empty_string, validate_path, validate_positive_number,
    validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// DOM extraction or network response capture.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ScrapeMode {
    #[default]
    Dom,
    Capture,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub scraper: ScraperSection,
    pub browser: BrowserConfig,
    pub stabilization: StabilizationConfig,
    pub dates: DatesConfig,
    pub selectors: SelectorProfile,
    pub capture: CaptureConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperSection {
    pub urls: Vec<String>,
    pub output_path: String,
    pub mode: ScrapeMode,
}

impl Default for ScraperSection {
    fn default() -> Self {
        Self {
            urls: DEFAULT_URLS.iter().map(|url| url.to_string()).collect(),
            output_path: ".".to_string(),
            mode: ScrapeMode::Dom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    pub headless: bool,
    pub network_idle_timeout_secs: u64,
    pub window_width: u32,
    pub window_height: u32,
    pub executable: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: false,
            network_idle_timeout_secs: 30,
            window_width: 1280,
            window_height: 900,
            executable: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizationConfig {
    pub pause_ms: u64,
    pub max_iterations: usize,
    pub max_duration_secs: u64,
}

impl Default for StabilizationConfig {
    fn default() -> Self {
        let defaults = StabilizeOptions::default();
        Self {
            pause_ms: defaults.pause.as_millis() as u64,
            max_iterations: defaults.max_iterations,
            max_duration_secs: defaults.max_duration.as_secs(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatesConfig {
    pub unknown_month: UnknownMonthPolicy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Substring of the response URL, e.g. the reviews API host.
    pub url_contains: String,
    /// JSON pointer to the item array inside each body.
    pub items_pointer: String,
    pub queue_capacity: usize,
    /// How long to keep listening once scrolling has settled.
    pub settle_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            url_contains: "public-api.reviews.2gis.com".to_string(),
            items_pointer: "/reviews".to_string(),
            queue_capacity: 1024,
            settle_ms: 1000,
        }
    }
}

impl ScraperConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ScrapeError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置，所有表格都可省略
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ScrapeError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未定義的保留原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::OnceLock;

        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR
            .get_or_init(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var pattern"));

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.scraper.urls.is_empty() {
            return Err(ScrapeError::MissingConfigError {
                field: "scraper.urls".to_string(),
            });
        }
        for url in &self.scraper.urls {
            validate_url("scraper.urls", url)?;
        }

        validate_path("scraper.output_path", &self.scraper.output_path)?;
        validate_positive_number(
            "browser.network_idle_timeout_secs",
            self.browser.network_idle_timeout_secs as usize,
            1,
        )?;
        validate_positive_number(
            "stabilization.max_iterations",
            self.stabilization.max_iterations,
            1,
        )?;
        self.selectors.validate()?;

        if self.scraper.mode == ScrapeMode::Capture {
            validate_non_empty_string("capture.url_contains", &self.capture.url_contains)?;
            validate_json_pointer("capture.items_pointer", &self.capture.items_pointer)?;
            validate_positive_number("capture.queue_capacity", self.capture.queue_capacity, 1)?;
        }

        Ok(())
    }
}

impl ConfigProvider for ScraperConfig {
    fn urls(&self) -> &[String] {
        &self.scraper.urls
    }

    fn output_path(&self) -> &str {
        &self.scraper.output_path
    }

    fn selectors(&self) -> &SelectorProfile {
        &self.selectors
    }

    fn stabilize_options(&self) -> StabilizeOptions {
        StabilizeOptions {
            pause: Duration::from_millis(self.stabilization.pause_ms),
            max_iterations: self.stabilization.max_iterations,
            max_duration: Duration::from_secs(self.stabilization.max_duration_secs),
        }
    }

    fn network_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.browser.network_idle_timeout_secs)
    }

    fn unknown_month_policy(&self) -> UnknownMonthPolicy {
        self.dates.unknown_month
    }

    fn response_filter(&self) -> ResponseFilter {
        ResponseFilter {
            url_contains: self.capture.url_contains.clone(),
            items_pointer: self.capture.items_pointer.clone(),
            queue_capacity: self.capture.queue_capacity,
            settle: Duration::from_millis(self.capture.settle_ms),
        }
    }
}

impl Validate for ScraperConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = ScraperConfig::from_toml_str("").unwrap();

        assert_eq!(config, ScraperConfig::default());
        assert_eq!(config.urls().len(), DEFAULT_URLS.len());
        assert_eq!(config.output_path(), ".");
        assert_eq!(config.stabilize_options(), StabilizeOptions::default());
        assert_eq!(config.unknown_month_policy(), UnknownMonthPolicy::January);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[scraper]
urls = ["https://2gis.kz/astana/firm/70000001018369329/tab/reviews"]
output_path = "./out"
mode = "capture"

[browser]
headless = true
network_idle_timeout_secs = 45

[stabilization]
pause_ms = 500
max_iterations = 20
max_duration_secs = 60

[dates]
unknown_month = "keep-raw"

[selectors]
version = "custom-1"
review_item = "div.card"

[capture]
url_contains = "reviews"
items_pointer = "/data/items"
queue_capacity = 16
settle_ms = 250
"#;

        let config = ScraperConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.scraper.mode, ScrapeMode::Capture);
        assert!(config.browser.headless);
        assert_eq!(config.network_idle_timeout(), Duration::from_secs(45));
        assert_eq!(
            config.stabilize_options(),
            StabilizeOptions {
                pause: Duration::from_millis(500),
                max_iterations: 20,
                max_duration: Duration::from_secs(60),
            }
        );
        assert_eq!(config.unknown_month_policy(), UnknownMonthPolicy::KeepRaw);
        assert_eq!(config.selectors().review_item, "div.card");
        assert_eq!(config.selectors().review_text, "a._1oir7fah");
        assert_eq!(
            config.response_filter(),
            ResponseFilter {
                url_contains: "reviews".to_string(),
                items_pointer: "/data/items".to_string(),
                queue_capacity: 16,
                settle: Duration::from_millis(250),
            }
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REVIEW_SCRAPER_TEST_OUT", "/tmp/reviews");

        let config = ScraperConfig::from_toml_str(
            r#"
[scraper]
output_path = "${REVIEW_SCRAPER_TEST_OUT}"
"#,
        )
        .unwrap();
        assert_eq!(config.output_path(), "/tmp/reviews");

        std::env::remove_var("REVIEW_SCRAPER_TEST_OUT");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = ScraperConfig::from_toml_str(
            r#"
[scraper]
urls = ["not a url"]
"#,
        )
        .unwrap();
        assert!(bad_url.validate().is_err());

        let no_urls = ScraperConfig::from_toml_str(
            r#"
[scraper]
urls = []
"#,
        )
        .unwrap();
        assert!(matches!(
            no_urls.validate(),
            Err(ScrapeError::MissingConfigError { .. })
        ));

        let bad_pointer = ScraperConfig::from_toml_str(
            r#"
[scraper]
mode = "capture"

[capture]
items_pointer = "reviews"
"#,
        )
        .unwrap();
        assert!(bad_pointer.validate().is_err());
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        let result = ScraperConfig::from_toml_str(
            r#"
[scraper]
mode = "api"
"#,
        );
        assert!(matches!(result, Err(ScrapeError::ConfigError { .. })));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[scraper]\noutput_path = \"./from-file\"\n")
            .unwrap();

        let config = ScraperConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");
    }
}
