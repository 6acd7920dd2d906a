use thiserror::Error;

/// Why a single fetch strategy produced no usable price.
///
/// These never reach the caller of [`crate::Extractor`]: they decide whether
/// the next strategy runs and end up as the description of a failed
/// [`pricewatch_core::ScrapeResult`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("timed out after {secs:.1}s fetching {url}")]
    Timeout { url: String, secs: f64 },

    #[error("browser render failed: {0}")]
    Render(String),

    #[error("headless browser is disabled")]
    BrowserUnavailable,

    #[error("no price found on {url}")]
    NoPrice { url: String },
}
