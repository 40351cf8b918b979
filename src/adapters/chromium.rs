//! Chrome DevTools Protocol backend for [`BrowserPage`] and [`ResponseSource`].

use crate::config::toml_config::BrowserConfig;
use crate::core::capture::parse_items;
use crate::domain::ports::{BrowserPage, ResponseCapture, ResponseFilter, ResponseSource};
use crate::utils::error::{Result, ScrapeError};
use async_trait::async_trait;
use base64::Engine;
use chromiumoxide::browser::{Browser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::network::{
    EventLoadingFinished, EventResponseReceived, GetResponseBodyParams, RequestId,
};
use chromiumoxide::cdp::browser_protocol::page::EventLifecycleEvent;
use chromiumoxide::element::Element;
use chromiumoxide::listeners::EventStream;
use chromiumoxide::Page;
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;

/// A launched Chrome process with the single page the scraper reuses.
pub struct ChromiumSession {
    browser: Browser,
    handler: JoinHandle<()>,
    page: ChromiumPage,
}

impl ChromiumSession {
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut builder = CdpConfig::builder().window_size(config.window_width, config.window_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if let Some(executable) = &config.executable {
            builder = builder.chrome_executable(executable);
        }
        let cdp_config = builder
            .build()
            .map_err(|message| ScrapeError::BrowserError { message })?;

        tracing::info!("🚀 Launching Chrome (headless: {})", config.headless);
        let (browser, mut events) = Browser::launch(cdp_config).await?;

        // CDP 訊息必須持續被消化，否則所有頁面指令都會卡住
        let handler = tokio::spawn(async move {
            while let Some(event) = events.next().await {
                if let Err(e) = event {
                    tracing::debug!("CDP handler error: {}", e);
                }
            }
        });

        let page = browser.new_page("about:blank").await?;

        Ok(Self {
            browser,
            handler,
            page: ChromiumPage::new(page),
        })
    }

    pub fn page(&self) -> ChromiumPage {
        self.page.clone()
    }

    pub async fn close(mut self) -> Result<()> {
        self.browser.close().await?;
        self.browser.wait().await?;
        self.handler.abort();
        tracing::info!("Browser closed");
        Ok(())
    }
}

#[derive(Clone)]
pub struct ChromiumPage {
    page: Page,
    /// Lifecycle events of the current navigation, consumed by the idle wait.
    lifecycle: Arc<Mutex<Option<(String, EventStream<EventLifecycleEvent>)>>>,
}

impl ChromiumPage {
    pub fn new(page: Page) -> Self {
        Self {
            page,
            lifecycle: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl BrowserPage for ChromiumPage {
    type Element = Element;

    async fn navigate(&self, url: &str) -> Result<()> {
        // 先訂閱再導航，避免錯過 networkIdle 事件
        let events = self.page.event_listener::<EventLifecycleEvent>().await?;
        *self.lifecycle.lock().await = Some((url.to_string(), events));

        self.page.goto(url).await?;
        Ok(())
    }

    async fn wait_for_network_idle(&self, timeout: Duration) -> Result<()> {
        let Some((url, mut events)) = self.lifecycle.lock().await.take() else {
            return Ok(());
        };
        let main_frame = self.page.mainframe().await?;

        let idle = tokio::time::timeout(timeout, async {
            while let Some(event) = events.next().await {
                let is_main = main_frame.as_ref().map_or(true, |id| *id == event.frame_id);
                if is_main && event.name == "networkIdle" {
                    return true;
                }
            }
            false
        })
        .await;

        match idle {
            Ok(true) => Ok(()),
            Ok(false) => Err(ScrapeError::BrowserError {
                message: format!("page closed while waiting for {} to go idle", url),
            }),
            Err(_) => Err(ScrapeError::NetworkIdleTimeout {
                url,
                timeout_secs: timeout.as_secs(),
            }),
        }
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<Element>> {
        Ok(self.page.find_elements(selector).await?)
    }

    async fn query_within(&self, scope: &Element, selector: &str) -> Result<Vec<Element>> {
        Ok(scope.find_elements(selector).await?)
    }

    async fn scroll_into_view(&self, element: &Element) -> Result<()> {
        element.scroll_into_view().await?;
        Ok(())
    }

    async fn text_content(&self, element: &Element) -> Result<String> {
        Ok(element.inner_text().await?.unwrap_or_default())
    }
}

#[async_trait]
impl ResponseSource for ChromiumPage {
    async fn subscribe(&self, filter: &ResponseFilter) -> Result<ResponseCapture> {
        let mut responses = self.page.event_listener::<EventResponseReceived>().await?;
        let mut finished = self.page.event_listener::<EventLoadingFinished>().await?;
        let (sender, receiver) = mpsc::channel(filter.queue_capacity);
        let page = self.page.clone();
        let filter = filter.clone();

        let pump = tokio::spawn(async move {
            // request id -> url, 等 loadingFinished 之後才能取 body
            let mut pending: HashMap<String, String> = HashMap::new();
            loop {
                tokio::select! {
                    Some(event) = responses.next() => {
                        if event.response.url.contains(&filter.url_contains) {
                            pending.insert(event.request_id.inner().clone(), event.response.url.clone());
                        }
                    }
                    Some(event) = finished.next() => {
                        let Some(url) = pending.remove(event.request_id.inner()) else {
                            continue;
                        };
                        let body = match response_body(&page, event.request_id.clone()).await {
                            Ok(body) => body,
                            Err(e) => {
                                tracing::warn!("Could not read body of {}: {}", url, e);
                                continue;
                            }
                        };
                        let items = match parse_items(&body, &filter.items_pointer) {
                            Ok(items) => items,
                            Err(e) => {
                                tracing::warn!("Skipping malformed response from {}: {}", url, e);
                                continue;
                            }
                        };
                        tracing::debug!("Captured {} items from {}", items.len(), url);
                        // CDP 事件串流不設上限，這裡等待只會延後取 body
                        for item in items {
                            if sender.send(item).await.is_err() {
                                return;
                            }
                        }
                    }
                    else => break,
                }
            }
        });

        Ok(ResponseCapture::new(receiver, pump))
    }
}

async fn response_body(page: &Page, request_id: RequestId) -> Result<String> {
    let response = page.execute(GetResponseBodyParams::new(request_id)).await?;
    let body = &response.result;
    if body.base64_encoded {
        let bytes = base64::engine::general_purpose::STANDARD
            .decode(&body.body)
            .map_err(|e| ScrapeError::BrowserError {
                message: format!("invalid base64 response body: {}", e),
            })?;
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        Ok(body.body.clone())
    }
}
