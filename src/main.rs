use clap::Parser;
use review_scraper::utils::error::ErrorSeverity;
use review_scraper::utils::{logger, validation::Validate};
use review_scraper::{
    CapturePipeline, ChromiumSession, CliConfig, EtlEngine, LocalStorage, ReviewPipeline,
    ScrapeError, ScrapeMode, ScraperConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting review-scraper");

    let config = match cli.resolve().and_then(|config| {
        config.validate()?;
        Ok(config)
    }) {
        Ok(config) => config,
        Err(e) => exit_with(e),
    };
    tracing::debug!("Resolved config: {:?}", config);
    tracing::info!(
        "Selector profile {}, {} addresses, mode {:?}",
        config.selectors.version,
        config.scraper.urls.len(),
        config.scraper.mode
    );

    let session = match ChromiumSession::launch(&config.browser).await {
        Ok(session) => session,
        Err(e) => exit_with(e),
    };

    let result = run(&session, config).await;

    // 不論成功與否都要關閉瀏覽器
    if let Err(e) = session.close().await {
        tracing::warn!("Browser did not close cleanly: {}", e);
    }

    match result {
        Ok(summary) => {
            tracing::info!("✅ Scrape completed successfully!");
            println!("✅ Done. Saved: {}", summary.written.join(", "));
            if !summary.skipped.is_empty() {
                println!("⚠️ Skipped (no data): {}", summary.skipped.join(", "));
            }
            Ok(())
        }
        Err(e) => exit_with(e),
    }
}

async fn run(
    session: &ChromiumSession,
    config: ScraperConfig,
) -> review_scraper::Result<review_scraper::domain::model::ExportSummary> {
    let storage = LocalStorage::new(config.scraper.output_path.clone());
    let mode = config.scraper.mode;

    match mode {
        ScrapeMode::Dom => {
            let pipeline = ReviewPipeline::new(session.page(), storage, config);
            EtlEngine::new(pipeline).run().await
        }
        ScrapeMode::Capture => {
            let pipeline = CapturePipeline::new(session.page(), storage, config);
            EtlEngine::new(pipeline).run().await
        }
    }
}

fn exit_with(e: ScrapeError) -> ! {
    // 記錄詳細錯誤信息
    tracing::error!(
        "❌ Scrape failed: {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );

    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 建議: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code)
}
