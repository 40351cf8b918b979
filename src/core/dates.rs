use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Suffix the site appends to reviews changed after posting.
pub const EDITED_MARKER: &str = ", отредактирован";

/// Russian month names as they appear in dates ("14 июля 2021").
const MONTHS: [(&str, &str); 12] = [
    ("января", "01"),
    ("февраля", "02"),
    ("марта", "03"),
    ("апреля", "04"),
    ("мая", "05"),
    ("июня", "06"),
    ("июля", "07"),
    ("августа", "08"),
    ("сентября", "09"),
    ("октября", "10"),
    ("ноября", "11"),
    ("декабря", "12"),
];

/// What to do with a date whose month name is not in the table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownMonthPolicy {
    /// Substitute January and log a warning.
    #[default]
    January,
    /// Keep the site text untouched.
    KeepRaw,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DateNormalizer {
    policy: UnknownMonthPolicy,
}

impl DateNormalizer {
    pub fn new(policy: UnknownMonthPolicy) -> Self {
        Self { policy }
    }

    /// `"14 июля 2021, отредактирован"` -> `"2021-07-14"`.
    ///
    /// Falls back to the cleaned input whenever the text is not a valid
    /// `<day> <month> <year>` date.
    pub fn normalize(&self, raw: &str) -> String {
        let cleaned = raw.replace(EDITED_MARKER, "");
        let cleaned = cleaned.trim();

        let parts: Vec<&str> = cleaned.split_whitespace().collect();
        let [day, month_name, year] = parts.as_slice() else {
            return cleaned.to_string();
        };
        // chrono's %d/%Y also take signs and short years
        if !is_digits(day, 1..=2) || !is_digits(year, 4..=4) {
            return cleaned.to_string();
        }

        let month = match month_number(month_name) {
            Some(month) => month,
            None => match self.policy {
                UnknownMonthPolicy::January => {
                    tracing::warn!(
                        "Unknown month name {:?} in {:?}, assuming January",
                        month_name,
                        cleaned
                    );
                    "01"
                }
                UnknownMonthPolicy::KeepRaw => {
                    tracing::debug!("Unknown month name {:?}, keeping raw date", month_name);
                    return cleaned.to_string();
                }
            },
        };

        let candidate = format!("{}.{}.{}", day, month, year);
        match NaiveDate::parse_from_str(&candidate, "%d.%m.%Y") {
            Ok(date) => date.format("%Y-%m-%d").to_string(),
            Err(_) => cleaned.to_string(),
        }
    }
}

fn is_digits(token: &str, len: std::ops::RangeInclusive<usize>) -> bool {
    len.contains(&token.len()) && token.bytes().all(|b| b.is_ascii_digit())
}

fn month_number(name: &str) -> Option<&'static str> {
    let lower = name.to_lowercase();
    MONTHS
        .iter()
        .find(|(month, _)| *month == lower)
        .map(|(_, number)| *number)
}
