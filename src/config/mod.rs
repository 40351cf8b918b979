#[cfg(feature = "cli")]
pub mod cli;
pub mod selectors;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use selectors::SelectorProfile;
pub use toml_config::{ScrapeMode, ScraperConfig};

macro_rules! firm_reviews {
    ($firm:literal, $point:literal) => {
        concat!(
            "https://2gis.kz/astana/search/%D0%9A%D0%B0%D0%B7%D0%B0%D1%85%D1%81%D0%BA%D0%B8%D0%B9%20%D1%8F%D0%B7%D1%8B%D0%BA%20(%D0%BA%D1%83%D1%80%D1%81%D1%8B%20%D0%BA%D0%B0%D0%B7%D0%B0%D1%85%D1%81%D0%BA%D0%BE%D0%B3%D0%BE%20%D1%8F%D0%B7%D1%8B%D0%BA%D0%B0)/attributeId/70000201006749283",
            "/firm/",
            $firm,
            "/",
            $point,
            "/tab/reviews?m=71.443111%2C51.12972%2F10.66"
        )
    };
}

/// Kazakh language courses in Astana, reviews tab of each firm.
///
/// Visited in order; a firm listed twice is scraped twice.
pub const DEFAULT_URLS: [&str; 10] = [
    firm_reviews!("70000001018369329", "71.417986%2C51.124297"),
    firm_reviews!("70000001059717979", "71.42735%2C51.113237"),
    firm_reviews!("70000001082581441", "71.390434%2C51.131573"),
    firm_reviews!("70000001082581441", "71.390434%2C51.131573"),
    firm_reviews!("70000001081314767", "71.403318%2C51.10992"),
    firm_reviews!("70000001082747308", "71.395133%2C51.123073"),
    firm_reviews!("70000001061805613", "71.43117%2C51.166362"),
    firm_reviews!("70000001051582827", "71.41166%2C51.142879"),
    firm_reviews!("70000001044593719", "71.425644%2C51.169037"),
    firm_reviews!("70000001040868982", "71.430998%2C51.123726"),
];
