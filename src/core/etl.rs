use crate::core::Pipeline;
use crate::domain::model::ExportSummary;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ExportSummary> {
        let started = Instant::now();
        tracing::info!("Starting scrape...");

        // Extract
        let raw_data = self.pipeline.extract().await?;
        tracing::info!("Extraction finished after {:?}", started.elapsed());

        // Transform
        let transformed = self.pipeline.transform(raw_data).await?;

        // Load
        let summary = self.pipeline.load(transformed).await?;
        tracing::info!(
            "Export finished in {:?}: {} written, {} skipped",
            started.elapsed(),
            summary.written.len(),
            summary.skipped.len()
        );

        Ok(summary)
    }
}
