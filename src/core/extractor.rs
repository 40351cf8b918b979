use crate::config::selectors::SelectorProfile;
use crate::domain::model::{RawCompany, RawReview, Stabilization};
use crate::domain::ports::BrowserPage;
use crate::utils::error::Result;

/// Company header fields read from the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyHeader {
    pub company_name: String,
    pub rating: String,
    pub total_reviews: String,
}

pub struct FieldExtractor<'a> {
    selectors: &'a SelectorProfile,
}

impl<'a> FieldExtractor<'a> {
    pub fn new(selectors: &'a SelectorProfile) -> Self {
        Self { selectors }
    }

    pub async fn company_header<P: BrowserPage>(&self, page: &P) -> Result<CompanyHeader> {
        Ok(CompanyHeader {
            company_name: first_text(page, None, &self.selectors.company_name).await?,
            rating: first_text(page, None, &self.selectors.company_rating).await?,
            total_reviews: first_text(page, None, &self.selectors.total_reviews).await?,
        })
    }

    pub async fn review<P: BrowserPage>(&self, page: &P, item: &P::Element) -> Result<RawReview> {
        let user_name = first_text(page, Some(item), &self.selectors.review_author).await?;
        let raw_date = first_text(page, Some(item), &self.selectors.review_date).await?;
        let text = first_text(page, Some(item), &self.selectors.review_text).await?;

        // 星等 = 評分容器內的圖示數量
        let rating = match page
            .query_within(item, &self.selectors.review_rating)
            .await?
            .first()
        {
            Some(container) => page
                .query_within(container, &self.selectors.review_star)
                .await?
                .len() as u32,
            None => 0,
        };

        Ok(RawReview {
            user_name,
            raw_date,
            rating,
            text,
        })
    }

    pub async fn company<P: BrowserPage>(
        &self,
        page: &P,
        source_url: &str,
        items: &[P::Element],
        stabilization: Stabilization,
    ) -> Result<RawCompany> {
        let header = self.company_header(page).await?;

        let mut reviews = Vec::with_capacity(items.len());
        for item in items {
            reviews.push(self.review(page, item).await?);
        }

        Ok(RawCompany {
            source_url: source_url.to_string(),
            company_name: header.company_name,
            rating: header.rating,
            total_reviews: header.total_reviews,
            reviews,
            stabilization,
        })
    }
}

/// Text of the first match, or `""` when nothing matches.
async fn first_text<P: BrowserPage>(
    page: &P,
    scope: Option<&P::Element>,
    selector: &str,
) -> Result<String> {
    let matches = match scope {
        Some(scope) => page.query_within(scope, selector).await?,
        None => page.query_all(selector).await?,
    };
    match matches.first() {
        Some(element) => page.text_content(element).await,
        None => Ok(String::new()),
    }
}
