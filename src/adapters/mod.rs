// Adapters layer: concrete implementations for external systems (browser, filesystem).

pub mod chromium;
pub mod storage;
