use crate::config::selectors::SelectorProfile;
use crate::core::dates::UnknownMonthPolicy;
use crate::core::loader::StabilizeOptions;
use crate::domain::model::{CapturedItem, ExportSummary};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn urls(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn selectors(&self) -> &SelectorProfile;
    fn stabilize_options(&self) -> StabilizeOptions;
    fn network_idle_timeout(&self) -> Duration;
    fn unknown_month_policy(&self) -> UnknownMonthPolicy;
    fn response_filter(&self) -> ResponseFilter;
}

/// The slice of browser automation the scraper relies on.
#[async_trait]
pub trait BrowserPage: Send + Sync {
    type Element: Send + Sync;

    async fn navigate(&self, url: &str) -> Result<()>;
    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()>;
    async fn query_all(&self, selector: &str) -> Result<Vec<Self::Element>>;
    async fn query_within(
        &self,
        scope: &Self::Element,
        selector: &str,
    ) -> Result<Vec<Self::Element>>;
    async fn scroll_into_view(&self, element: &Self::Element) -> Result<()>;
    async fn text_content(&self, element: &Self::Element) -> Result<String>;
}

/// Which responses to capture and where the items live in their bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseFilter {
    pub url_contains: String,
    pub items_pointer: String,
    pub queue_capacity: usize,
    /// Quiet period after loading settles before the capture is closed.
    pub settle: Duration,
}

#[async_trait]
pub trait ResponseSource: Send + Sync {
    async fn subscribe(&self, filter: &ResponseFilter) -> Result<ResponseCapture>;
}

/// A live response subscription.
///
/// A background pump pushes items into a bounded queue and waits for room
/// when it is full, so nothing is lost while the consumer is busy. Dropping
/// the capture aborts the pump, which releases the underlying event listeners.
pub struct ResponseCapture {
    receiver: mpsc::Receiver<CapturedItem>,
    pump: JoinHandle<()>,
}

impl ResponseCapture {
    pub fn new(receiver: mpsc::Receiver<CapturedItem>, pump: JoinHandle<()>) -> Self {
        Self { receiver, pump }
    }

    pub async fn next(&mut self) -> Option<CapturedItem> {
        self.receiver.recv().await
    }

    /// Receives until no item has arrived for `quiet`.
    pub async fn collect_until_quiet(&mut self, quiet: Duration) -> Vec<CapturedItem> {
        let mut items = Vec::new();
        while let Ok(Some(item)) = tokio::time::timeout(quiet, self.receiver.recv()).await {
            items.push(item);
        }
        items
    }

    pub fn is_active(&self) -> bool {
        !self.pump.is_finished()
    }
}

impl Drop for ResponseCapture {
    fn drop(&mut self) {
        self.pump.abort();
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    type Extracted: Send;
    type Transformed: Send;

    async fn extract(&self) -> Result<Self::Extracted>;
    async fn transform(&self, data: Self::Extracted) -> Result<Self::Transformed>;
    async fn load(&self, result: Self::Transformed) -> Result<ExportSummary>;
}
