pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::{ScrapeMode, ScraperConfig, SelectorProfile};

pub use adapters::{
    chromium::{ChromiumPage, ChromiumSession},
    storage::LocalStorage,
};
pub use crate::core::{
    capture_pipeline::CapturePipeline, dates::DateNormalizer, etl::EtlEngine,
    pipeline::ReviewPipeline,
};
pub use utils::error::{Result, ScrapeError};
