//! Document acquisition backends.
//!
//! Two interchangeable strategies sit behind [`FetchStrategy`]: a plain HTTP
//! GET ([`HttpStrategy`]) and a headless browser render ([`BrowserStrategy`]).
//! Both are stateless across calls: every invocation gets a fresh client or
//! browser session.

mod browser;
mod chromium;
mod http;

use std::fmt;

use async_trait::async_trait;
use pricewatch_core::Store;

use crate::error::FetchError;
use crate::parsers::extract_html;

pub use browser::{
    BrowserLauncher, BrowserSession, BrowserStrategy, DisabledBrowser, SessionOptions,
};
pub use chromium::ChromiumLauncher;
pub use http::HttpStrategy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    Lightweight,
    Heavy,
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Lightweight => write!(f, "lightweight"),
            StrategyKind::Heavy => write!(f, "heavy"),
        }
    }
}

/// Parser output for a page that yielded a positive price.
#[derive(Debug, Clone, PartialEq)]
pub struct PricedPage {
    pub name: Option<String>,
    pub price: f64,
    pub currency: String,
    pub in_stock: bool,
}

/// A way of turning a URL into page HTML.
#[async_trait]
pub trait FetchStrategy: Send + Sync {
    fn kind(&self) -> StrategyKind;

    /// Fetches the page and returns its HTML.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on transport failure, non-success status,
    /// timeout, or render failure.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Runs one strategy end to end: fetch, parse with the store's rules, and
/// require a positive price.
///
/// # Errors
///
/// Propagates the strategy's [`FetchError`], or returns
/// [`FetchError::NoPrice`] when the page was fetched but holds no price.
pub async fn attempt(
    strategy: &dyn FetchStrategy,
    url: &str,
    store: Store,
) -> Result<PricedPage, FetchError> {
    let html = strategy.fetch(url).await?;
    let raw = extract_html(store, &html);
    let Some(price) = raw.usable_price() else {
        tracing::debug!(url, %store, strategy = %strategy.kind(), "parser found no price");
        return Err(FetchError::NoPrice {
            url: url.to_owned(),
        });
    };
    Ok(PricedPage {
        name: raw.name,
        price,
        currency: raw.currency,
        in_stock: raw.in_stock,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(&'static str);

    #[async_trait]
    impl FetchStrategy for Canned {
        fn kind(&self) -> StrategyKind {
            StrategyKind::Lightweight
        }

        async fn fetch(&self, _url: &str) -> Result<String, FetchError> {
            Ok(self.0.to_owned())
        }
    }

    #[tokio::test]
    async fn attempt_returns_priced_page() {
        let strategy = Canned(
            r#"<meta property="og:title" content="Silla gamer"><span class="price">$ 250.000</span>"#,
        );
        let page = attempt(&strategy, "https://tienda.example/silla", Store::Generic)
            .await
            .unwrap();
        assert_eq!(page.price, 250_000.0);
        assert_eq!(page.name.as_deref(), Some("Silla gamer"));
        assert_eq!(page.currency, "ARS");
        assert!(page.in_stock);
    }

    #[tokio::test]
    async fn attempt_rejects_zero_price() {
        let strategy = Canned(r#"<span class="price">$ 0</span>"#);
        let result = attempt(&strategy, "https://tienda.example/gratis", Store::Generic).await;
        assert!(matches!(result, Err(FetchError::NoPrice { .. })), "{result:?}");
    }
}
