use crate::domain::model::{CapturedItem, Company};
use crate::export::value_to_text;
use crate::utils::error::Result;
use serde::Serialize;

/// One CSV row per review, company fields repeated.
#[derive(Debug, Serialize)]
struct ReviewRow<'a> {
    company_name: &'a str,
    company_rating: &'a str,
    company_total_reviews: &'a str,
    user_name: &'a str,
    review_date: &'a str,
    review_rating: u32,
    review_text: &'a str,
}

pub const REVIEW_COLUMNS: [&str; 7] = [
    "company_name",
    "company_rating",
    "company_total_reviews",
    "user_name",
    "review_date",
    "review_rating",
    "review_text",
];

/// Returns `None` for an empty collection; nothing should be written then.
pub fn companies_to_csv(companies: &[Company]) -> Result<Option<Vec<u8>>> {
    if companies.is_empty() {
        tracing::warn!("No companies to export, skipping CSV");
        return Ok(None);
    }

    let mut writer = ::csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // 先寫表頭，沒有評論的公司也保持固定欄位
    writer.write_record(REVIEW_COLUMNS)?;

    for company in companies {
        for review in &company.reviews {
            writer.serialize(ReviewRow {
                company_name: &company.company_name,
                company_rating: &company.rating,
                company_total_reviews: &company.total_reviews,
                user_name: &review.user_name,
                review_date: &review.date,
                review_rating: review.rating,
                review_text: &review.text,
            })?;
        }
    }

    finish(writer).map(Some)
}

/// One row per captured item; the header comes from the first item's keys.
///
/// Keys that only appear on later items are dropped, keys missing from an
/// item are written as empty cells.
pub fn items_to_csv(items: &[CapturedItem]) -> Result<Option<Vec<u8>>> {
    let Some(first) = items.first() else {
        tracing::warn!("No captured items to export, skipping CSV");
        return Ok(None);
    };

    let columns: Vec<&String> = first.keys().collect();
    let mut writer = ::csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;

    for item in items {
        let extra = item.keys().filter(|key| !first.contains_key(*key)).count();
        if extra > 0 {
            tracing::debug!("Captured item has {} keys outside the CSV header", extra);
        }
        let row: Vec<String> = columns
            .iter()
            .map(|column| item.get(*column).map(value_to_text).unwrap_or_default())
            .collect();
        writer.write_record(&row)?;
    }

    finish(writer).map(Some)
}

fn finish(writer: ::csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| std::io::Error::other(e.to_string()).into())
}
