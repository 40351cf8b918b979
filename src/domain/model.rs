use serde::{Deserialize, Serialize};

/// One reviewed business, as exported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub company_name: String,
    pub rating: String,
    pub total_reviews: String,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub user_name: String,
    /// `YYYY-MM-DD`, or the cleaned site text when it could not be parsed.
    pub date: String,
    pub rating: u32,
    pub text: String,
}

/// How the scroll loop ended for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stabilization {
    Settled,
    /// Bound hit while the collection was still growing; results are partial.
    TimedOut,
}

/// Company fields as read from the page, before normalization.
#[derive(Debug, Clone)]
pub struct RawCompany {
    pub source_url: String,
    pub company_name: String,
    pub rating: String,
    pub total_reviews: String,
    pub reviews: Vec<RawReview>,
    pub stabilization: Stabilization,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawReview {
    pub user_name: String,
    pub raw_date: String,
    pub rating: u32,
    pub text: String,
}

/// A JSON object lifted out of an intercepted response, keys in document order.
pub type CapturedItem = serde_json::Map<String, serde_json::Value>;

/// Items captured while one address was loading.
#[derive(Debug, Clone)]
pub struct CapturedPage {
    pub source_url: String,
    pub items: Vec<CapturedItem>,
    pub stabilization: Stabilization,
}

/// Serialized output of one run, keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct ExportBundle {
    pub files: Vec<(String, Vec<u8>)>,
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}
