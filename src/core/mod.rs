pub mod capture;
pub mod capture_pipeline;
pub mod dates;
pub mod etl;
pub mod extractor;
pub mod loader;
pub mod pipeline;

pub use crate::domain::model::{Company, RawCompany, Review};
pub use crate::domain::ports::{BrowserPage, ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
