#![allow(dead_code)]

use async_trait::async_trait;
use review_scraper::core::loader::StabilizeOptions;
use review_scraper::core::dates::UnknownMonthPolicy;
use review_scraper::domain::model::CapturedItem;
use review_scraper::domain::ports::{
    BrowserPage, ConfigProvider, ResponseCapture, ResponseFilter, ResponseSource,
};
use review_scraper::core::capture::parse_items;
use review_scraper::{Result, ScrapeError, SelectorProfile};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

#[derive(Debug, Clone)]
pub struct FakeReview {
    pub author: &'static str,
    pub date: &'static str,
    pub stars: usize,
    pub text: &'static str,
}

#[derive(Debug, Clone)]
pub struct FakeFirm {
    pub name: &'static str,
    pub rating: &'static str,
    pub total: &'static str,
    pub reviews: Vec<FakeReview>,
    /// Cards revealed per scroll.
    pub batch: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FakeElement {
    Name,
    Rating,
    Total,
    Card(usize),
    Author(usize),
    Date(usize),
    Text(usize),
    StarBox(usize),
    Star,
}

#[derive(Default)]
struct SiteState {
    current: Option<String>,
    loaded: usize,
    scrolls: usize,
    visited: Vec<String>,
}

/// In-memory stand-in for a rendered firm page with lazy-loaded review cards.
pub struct FakeSite {
    firms: HashMap<String, FakeFirm>,
    selectors: SelectorProfile,
    state: Mutex<SiteState>,
    /// Response bodies "sent" by the page per URL, for capture mode.
    responses: HashMap<String, Vec<String>>,
    /// Unbounded feed into the current pump, as CDP event streams are.
    subscriber: Mutex<Option<(mpsc::UnboundedSender<CapturedItem>, String)>>,
    dropped: Mutex<usize>,
}

impl FakeSite {
    pub fn new(firms: Vec<(&str, FakeFirm)>) -> Self {
        Self {
            firms: firms
                .into_iter()
                .map(|(url, firm)| (url.to_string(), firm))
                .collect(),
            selectors: SelectorProfile::default(),
            state: Mutex::new(SiteState::default()),
            responses: HashMap::new(),
            subscriber: Mutex::new(None),
            dropped: Mutex::new(0),
        }
    }

    pub fn with_responses(mut self, url: &str, bodies: Vec<String>) -> Self {
        self.responses.insert(url.to_string(), bodies);
        self
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().unwrap().visited.clone()
    }

    /// Items the page tried to deliver after the capture was released.
    pub fn dropped(&self) -> usize {
        *self.dropped.lock().unwrap()
    }

    /// True once the pump of the last subscription has been torn down.
    pub fn subscription_closed(&self) -> bool {
        self.subscriber
            .lock()
            .unwrap()
            .as_ref()
            .map_or(true, |(feed, _)| feed.is_closed())
    }

    /// Waits (bounded) for the pump of the last subscription to go away.
    pub async fn wait_for_release(&self) -> bool {
        tokio::time::timeout(Duration::from_secs(1), async {
            while !self.subscription_closed() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .is_ok()
    }

    fn deliver(&self, url: &str) {
        let Some(bodies) = self.responses.get(url) else {
            return;
        };
        let subscriber = self.subscriber.lock().unwrap();
        let Some((feed, pointer)) = subscriber.as_ref() else {
            return;
        };
        for body in bodies {
            // malformed bodies are skipped, as the real pump does
            let Ok(items) = parse_items(body, pointer) else {
                continue;
            };
            for item in items {
                if feed.send(item).is_err() {
                    *self.dropped.lock().unwrap() += 1;
                }
            }
        }
    }

    pub fn scrolls(&self) -> usize {
        self.state.lock().unwrap().scrolls
    }

    fn firm(&self) -> Option<FakeFirm> {
        let state = self.state.lock().unwrap();
        state
            .current
            .as_ref()
            .and_then(|url| self.firms.get(url))
            .cloned()
    }

    fn review(&self, index: usize) -> Option<FakeReview> {
        self.firm().and_then(|firm| firm.reviews.get(index).cloned())
    }
}

#[async_trait]
impl BrowserPage for FakeSite {
    type Element = FakeElement;

    async fn navigate(&self, url: &str) -> Result<()> {
        let Some(firm) = self.firms.get(url) else {
            return Err(ScrapeError::BrowserError {
                message: format!("net::ERR_NAME_NOT_RESOLVED at {}", url),
            });
        };
        {
            let mut state = self.state.lock().unwrap();
            state.current = Some(url.to_string());
            state.visited.push(url.to_string());
            state.loaded = firm.batch.min(firm.reviews.len());
        }
        self.deliver(url);
        Ok(())
    }

    async fn wait_for_network_idle(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<FakeElement>> {
        let Some(firm) = self.firm() else {
            return Ok(Vec::new());
        };
        let loaded = self.state.lock().unwrap().loaded;
        let s = &self.selectors;

        Ok(if selector == s.company_name && !firm.name.is_empty() {
            vec![FakeElement::Name]
        } else if selector == s.company_rating && !firm.rating.is_empty() {
            vec![FakeElement::Rating]
        } else if selector == s.total_reviews && !firm.total.is_empty() {
            vec![FakeElement::Total]
        } else if selector == s.review_item {
            (0..loaded).map(FakeElement::Card).collect()
        } else {
            Vec::new()
        })
    }

    async fn query_within(&self, scope: &FakeElement, selector: &str) -> Result<Vec<FakeElement>> {
        let s = &self.selectors;
        Ok(match *scope {
            FakeElement::Card(i) => {
                let Some(review) = self.review(i) else {
                    return Ok(Vec::new());
                };
                if selector == s.review_author && !review.author.is_empty() {
                    vec![FakeElement::Author(i)]
                } else if selector == s.review_date && !review.date.is_empty() {
                    vec![FakeElement::Date(i)]
                } else if selector == s.review_text && !review.text.is_empty() {
                    vec![FakeElement::Text(i)]
                } else if selector == s.review_rating && review.stars > 0 {
                    vec![FakeElement::StarBox(i)]
                } else {
                    Vec::new()
                }
            }
            FakeElement::StarBox(i) if selector == s.review_star => {
                let stars = self.review(i).map(|r| r.stars).unwrap_or(0);
                vec![FakeElement::Star; stars]
            }
            _ => Vec::new(),
        })
    }

    async fn scroll_into_view(&self, element: &FakeElement) -> Result<()> {
        let total = self.firm().map(|firm| (firm.reviews.len(), firm.batch));
        let mut state = self.state.lock().unwrap();
        state.scrolls += 1;
        if let (FakeElement::Card(_), Some((len, batch))) = (element, total) {
            state.loaded = (state.loaded + batch).min(len);
        }
        Ok(())
    }

    async fn text_content(&self, element: &FakeElement) -> Result<String> {
        let firm = self.firm();
        let text = match (*element, firm) {
            (FakeElement::Name, Some(firm)) => firm.name,
            (FakeElement::Rating, Some(firm)) => firm.rating,
            (FakeElement::Total, Some(firm)) => firm.total,
            (FakeElement::Author(i), _) => self.review(i).map(|r| r.author).unwrap_or(""),
            (FakeElement::Date(i), _) => self.review(i).map(|r| r.date).unwrap_or(""),
            (FakeElement::Text(i), _) => self.review(i).map(|r| r.text).unwrap_or(""),
            _ => "",
        };
        Ok(text.to_string())
    }
}

#[async_trait]
impl ResponseSource for FakeSite {
    async fn subscribe(&self, filter: &ResponseFilter) -> Result<ResponseCapture> {
        let (sender, receiver) = mpsc::channel(filter.queue_capacity);
        let (feed, mut events) = mpsc::unbounded_channel();
        *self.subscriber.lock().unwrap() = Some((feed, filter.items_pointer.clone()));
        // bodies are fed from navigate(); the pump waits for queue room like the real one
        let pump = tokio::spawn(async move {
            while let Some(item) = events.recv().await {
                if sender.send(item).await.is_err() {
                    return;
                }
            }
        });
        Ok(ResponseCapture::new(receiver, pump))
    }
}

pub struct TestConfig {
    pub urls: Vec<String>,
    pub selectors: SelectorProfile,
    pub stabilize: StabilizeOptions,
    pub policy: UnknownMonthPolicy,
    pub filter: ResponseFilter,
}

impl TestConfig {
    pub fn new(urls: &[&str]) -> Self {
        Self {
            urls: urls.iter().map(|url| url.to_string()).collect(),
            selectors: SelectorProfile::default(),
            stabilize: StabilizeOptions {
                pause: Duration::ZERO,
                ..StabilizeOptions::default()
            },
            policy: UnknownMonthPolicy::January,
            filter: ResponseFilter {
                url_contains: "reviews".to_string(),
                items_pointer: "/reviews".to_string(),
                queue_capacity: 64,
                settle: Duration::from_millis(20),
            },
        }
    }
}

impl ConfigProvider for TestConfig {
    fn urls(&self) -> &[String] {
        &self.urls
    }

    fn output_path(&self) -> &str {
        "."
    }

    fn selectors(&self) -> &SelectorProfile {
        &self.selectors
    }

    fn stabilize_options(&self) -> StabilizeOptions {
        self.stabilize
    }

    fn network_idle_timeout(&self) -> Duration {
        Duration::from_secs(1)
    }

    fn unknown_month_policy(&self) -> UnknownMonthPolicy {
        self.policy
    }

    fn response_filter(&self) -> ResponseFilter {
        self.filter.clone()
    }
}

pub fn review(author: &'static str, date: &'static str, stars: usize, text: &'static str) -> FakeReview {
    FakeReview {
        author,
        date,
        stars,
        text,
    }
}

pub fn item(json: &str) -> CapturedItem {
    serde_json::from_str(json).unwrap()
}
