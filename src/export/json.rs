use crate::domain::model::{CapturedItem, Company};
use crate::utils::error::Result;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

fn to_pretty_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    Ok(buffer)
}

/// Nested company/review array; non-ASCII text is written as-is.
pub fn companies_to_json(companies: &[Company]) -> Result<Vec<u8>> {
    to_pretty_bytes(companies)
}

pub fn items_to_json(items: &[CapturedItem]) -> Result<Vec<u8>> {
    to_pretty_bytes(items)
}
