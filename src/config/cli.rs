use crate::config::toml_config::{ScrapeMode, ScraperConfig};
use crate::utils::error::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "review-scraper")]
#[command(about = "Scrape business reviews from 2GIS into JSON, CSV and XML")]
pub struct CliConfig {
    #[arg(long, help = "TOML config file; every table is optional")]
    pub config: Option<PathBuf>,

    #[arg(long = "url", help = "Firm page to scrape (repeatable, replaces the configured list)")]
    pub urls: Vec<String>,

    #[arg(
        long = "output-dir",
        alias = "output-path",
        help = "Directory for comments.json/.csv/.xml"
    )]
    pub output_path: Option<String>,

    #[arg(long, value_enum)]
    pub mode: Option<ScrapeMode>,

    #[arg(long, help = "Run Chrome without a window")]
    pub headless: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    /// 讀取設定檔 (若有)，再以命令列參數覆蓋
    pub fn resolve(&self) -> Result<ScraperConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config from {}", path.display());
                ScraperConfig::from_file(path)?
            }
            None => ScraperConfig::default(),
        };

        if !self.urls.is_empty() {
            config.scraper.urls = self.urls.clone();
        }
        if let Some(output_path) = &self.output_path {
            config.scraper.output_path = output_path.clone();
        }
        if let Some(mode) = self.mode {
            config.scraper.mode = mode;
        }
        if self.headless {
            config.browser.headless = true;
        }

        Ok(config)
    }
}
