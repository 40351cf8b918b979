//! Serializers for the scraped collections.
//!
//! Every serializer borrows its input and returns the encoded bytes, so the
//! same collection can be handed to all of them in any order.

pub mod csv;
pub mod json;
pub mod xml;

pub const JSON_FILE: &str = "comments.json";
pub const CSV_FILE: &str = "comments.csv";
pub const XML_FILE: &str = "comments.xml";

/// Text form of a JSON value for flat formats: strings unquoted, `null` empty.
pub(crate) fn value_to_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
