use crate::core::dates::DateNormalizer;
use crate::core::extractor::FieldExtractor;
use crate::core::loader::stabilize;
use crate::domain::model::{
    Company, ExportBundle, ExportSummary, RawCompany, Review, Stabilization,
};
use crate::domain::ports::{BrowserPage, ConfigProvider, Pipeline, Storage};
use crate::export::{self, CSV_FILE, JSON_FILE, XML_FILE};
use crate::utils::error::Result;

/// Scrapes review cards from the rendered page of each configured address.
pub struct ReviewPipeline<P: BrowserPage, S: Storage, C: ConfigProvider> {
    page: P,
    storage: S,
    config: C,
}

impl<P: BrowserPage, S: Storage, C: ConfigProvider> ReviewPipeline<P, S, C> {
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

    /// navigate -> idle -> stabilize -> extract for one address.
    pub async fn scrape_company(&self, url: &str) -> Result<RawCompany> {
        let selectors = self.config.selectors();

        self.page.navigate(url).await?;
        self.page
            .wait_for_network_idle(self.config.network_idle_timeout())
            .await?;

        let loaded = stabilize(
            &self.page,
            &selectors.review_item,
            &self.config.stabilize_options(),
        )
        .await?;
        tracing::debug!(
            "Loaded {} review cards after {} scrolls",
            loaded.elements.len(),
            loaded.iterations
        );

        FieldExtractor::new(selectors)
            .company(&self.page, url, &loaded.elements, loaded.outcome)
            .await
    }
}

pub(crate) async fn write_bundle<S: Storage>(
    storage: &S,
    bundle: ExportBundle,
) -> Result<ExportSummary> {
    let mut summary = ExportSummary {
        skipped: bundle.skipped,
        ..ExportSummary::default()
    };
    for (name, data) in bundle.files {
        storage.write_file(&name, &data).await?;
        tracing::info!("💾 Saved {}", name);
        summary.written.push(name);
    }
    for name in &summary.skipped {
        tracing::warn!("Skipped {}: nothing to write", name);
    }
    Ok(summary)
}

#[async_trait::async_trait]
impl<P: BrowserPage, S: Storage, C: ConfigProvider> Pipeline for ReviewPipeline<P, S, C> {
    type Extracted = Vec<RawCompany>;
    type Transformed = Vec<Company>;

    async fn extract(&self) -> Result<Vec<RawCompany>> {
        let urls = self.config.urls();
        let mut companies = Vec::with_capacity(urls.len());

        for (index, url) in urls.iter().enumerate() {
            tracing::info!("🔎 [{}/{}] Processing {}", index + 1, urls.len(), url);
            let company = self.scrape_company(url).await?;
            if company.stabilization == Stabilization::TimedOut {
                tracing::warn!(
                    "{} kept loading reviews, keeping {} partial results",
                    url,
                    company.reviews.len()
                );
            }
            companies.push(company);
        }

        Ok(companies)
    }

    async fn transform(&self, data: Vec<RawCompany>) -> Result<Vec<Company>> {
        let normalizer = DateNormalizer::new(self.config.unknown_month_policy());

        Ok(data
            .into_iter()
            .map(|raw| Company {
                company_name: raw.company_name,
                rating: raw.rating,
                total_reviews: raw.total_reviews,
                reviews: raw
                    .reviews
                    .into_iter()
                    .map(|review| Review {
                        date: normalizer.normalize(&review.raw_date),
                        user_name: review.user_name,
                        rating: review.rating,
                        text: review.text,
                    })
                    .collect(),
            })
            .collect())
    }

    async fn load(&self, companies: Vec<Company>) -> Result<ExportSummary> {
        let mut bundle = ExportBundle::default();

        bundle
            .files
            .push((JSON_FILE.to_string(), export::json::companies_to_json(&companies)?));
        match export::csv::companies_to_csv(&companies)? {
            Some(data) => bundle.files.push((CSV_FILE.to_string(), data)),
            None => bundle.skipped.push(CSV_FILE.to_string()),
        }
        bundle
            .files
            .push((XML_FILE.to_string(), export::xml::companies_to_xml(&companies)?));

        write_bundle(&self.storage, bundle).await
    }
}
