use crate::core::loader::stabilize;
use crate::core::pipeline::write_bundle;
use crate::domain::model::{CapturedItem, CapturedPage, ExportBundle, ExportSummary, Stabilization};
use crate::domain::ports::{BrowserPage, ConfigProvider, Pipeline, ResponseSource, Storage};
use crate::export::{self, CSV_FILE, JSON_FILE, XML_FILE};
use crate::utils::error::Result;

/// Collects review items from the site's own API responses instead of the DOM.
///
/// Scrolling still drives the page, since every scroll makes the site fetch
/// the next batch; the markup itself is only used to count cards.
pub struct CapturePipeline<P, S, C>
where
    P: BrowserPage + ResponseSource,
    S: Storage,
    C: ConfigProvider,
{
    page: P,
    storage: S,
    config: C,
}

impl<P, S, C> CapturePipeline<P, S, C>
where
    P: BrowserPage + ResponseSource,
    S: Storage,
    C: ConfigProvider,
{
    pub fn new(page: P, storage: S, config: C) -> Self {
        Self {
            page,
            storage,
            config,
        }
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub async fn capture_page(&self, url: &str) -> Result<CapturedPage> {
        let filter = self.config.response_filter();
        // capture 在此函式結束時 drop，監聽器隨之釋放
        let mut capture = self.page.subscribe(&filter).await?;
        let mut items = Vec::new();

        self.page.navigate(url).await?;
        self.page
            .wait_for_network_idle(self.config.network_idle_timeout())
            .await?;

        // 邊滾動邊收，避免佇列塞滿
        let options = self.config.stabilize_options();
        let stabilizing = stabilize(&self.page, &self.config.selectors().review_item, &options);
        tokio::pin!(stabilizing);
        let loaded = loop {
            tokio::select! {
                loaded = &mut stabilizing => break loaded?,
                Some(item) = capture.next() => items.push(item),
            }
        };

        items.extend(capture.collect_until_quiet(filter.settle).await);
        tracing::debug!(
            "Captured {} items while {} cards were loaded",
            items.len(),
            loaded.elements.len()
        );

        Ok(CapturedPage {
            source_url: url.to_string(),
            items,
            stabilization: loaded.outcome,
        })
    }
}

#[async_trait::async_trait]
impl<P, S, C> Pipeline for CapturePipeline<P, S, C>
where
    P: BrowserPage + ResponseSource,
    S: Storage,
    C: ConfigProvider,
{
    type Extracted = Vec<CapturedPage>;
    type Transformed = Vec<CapturedItem>;

    async fn extract(&self) -> Result<Vec<CapturedPage>> {
        let urls = self.config.urls();
        let mut pages = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("📡 [{}/{}] Capturing {}", index + 1, urls.len(), url);
            let page = self.capture_page(url).await?;
            if page.stabilization == Stabilization::TimedOut {
                tracing::warn!("{} kept loading, capture may be partial", url);
            }
            pages.push(page);
        }

        Ok(pages)
    }

    async fn transform(&self, pages: Vec<CapturedPage>) -> Result<Vec<CapturedItem>> {
        Ok(pages.into_iter().flat_map(|page| page.items).collect())
    }

    async fn load(&self, items: Vec<CapturedItem>) -> Result<ExportSummary> {
        let mut bundle = ExportBundle::default();

        bundle
            .files
            .push((JSON_FILE.to_string(), export::json::items_to_json(&items)?));
        match export::csv::items_to_csv(&items)? {
            Some(data) => bundle.files.push((CSV_FILE.to_string(), data)),
            None => bundle.skipped.push(CSV_FILE.to_string()),
        }
        bundle
            .files
            .push((XML_FILE.to_string(), export::xml::items_to_xml(&items)?));

        write_bundle(&self.storage, bundle).await
    }
}
