//! Price and stock extraction for online store product pages.
//!
//! [`Extractor`] resolves the store, fetches the page with a lightweight
//! HTTP GET, falls back to a headless browser render, and hands the HTML to
//! the store's parser.

pub mod detect;
pub mod document;
pub mod error;
pub mod extractor;
pub mod fetch;
pub mod normalize;
pub mod parsers;
pub mod user_agent;

pub use detect::detect_store;
pub use document::Document;
pub use error::FetchError;
pub use extractor::Extractor;
pub use fetch::{
    attempt, BrowserLauncher, BrowserSession, BrowserStrategy, ChromiumLauncher, DisabledBrowser,
    FetchStrategy, HttpStrategy, PricedPage, SessionOptions, StrategyKind,
};
pub use normalize::normalize_price;
pub use parsers::{extract_html, RawExtraction};
