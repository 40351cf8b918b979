use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

/// CSS selectors for one revision of the site's markup.
///
/// The site ships hashed class names that change with its frontend builds;
/// bump `version` together with the selectors so exported data can be traced
/// back to the mapping that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorProfile {
    pub version: String,
    pub company_name: String,
    pub company_rating: String,
    pub total_reviews: String,
    /// Repeating review card; drives the scroll loop.
    pub review_item: String,
    pub review_author: String,
    pub review_date: String,
    /// Container whose `review_star` children are counted.
    pub review_rating: String,
    pub review_star: String,
    pub review_text: String,
}

impl Default for SelectorProfile {
    fn default() -> Self {
        Self::two_gis()
    }
}

impl SelectorProfile {
    /// 2GIS firm page, reviews tab.
    pub fn two_gis() -> Self {
        Self {
            version: "2gis-2025.01".to_string(),
            company_name: "h1._cwjbox>span".to_string(),
            company_rating: "div._y10azs".to_string(),
            total_reviews: "span._1xhlznaa".to_string(),
            review_item: "div._1k5soqfl".to_string(),
            review_author: "span._16s5yj36".to_string(),
            review_date: "div._139ll30".to_string(),
            review_rating: "div._1fkin5c".to_string(),
            review_star: "span".to_string(),
            review_text: "a._1oir7fah".to_string(),
        }
    }

    fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("selectors.version", &self.version),
            ("selectors.company_name", &self.company_name),
            ("selectors.company_rating", &self.company_rating),
            ("selectors.total_reviews", &self.total_reviews),
            ("selectors.review_item", &self.review_item),
            ("selectors.review_author", &self.review_author),
            ("selectors.review_date", &self.review_date),
            ("selectors.review_rating", &self.review_rating),
            ("selectors.review_star", &self.review_star),
            ("selectors.review_text", &self.review_text),
        ]
    }
}

impl Validate for SelectorProfile {
    fn validate(&self) -> Result<()> {
        for (field, value) in self.fields() {
            validate_non_empty_string(field, value)?;
        }
        Ok(())
    }
}
