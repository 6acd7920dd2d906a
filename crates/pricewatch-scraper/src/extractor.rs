//! Extraction orchestrator: store resolution, pacing, and the
//! lightweight → heavy fallback.

use std::time::Duration;

use pricewatch_core::{AppConfig, ProductRef, ScrapeResult};

use crate::detect::detect_store;
use crate::fetch::{
    attempt, BrowserStrategy, ChromiumLauncher, DisabledBrowser, FetchStrategy, HttpStrategy,
};

/// Runs one product through the pipeline.
///
/// Holds no mutable state, so a single `Extractor` can serve concurrent
/// extractions of distinct products. Callers bound that concurrency: every
/// heavy attempt starts a full browser.
pub struct Extractor {
    lightweight: Box<dyn FetchStrategy>,
    heavy: Box<dyn FetchStrategy>,
    pacing_delay: Duration,
}

impl Extractor {
    #[must_use]
    pub fn new(
        lightweight: Box<dyn FetchStrategy>,
        heavy: Box<dyn FetchStrategy>,
        pacing_delay: Duration,
    ) -> Self {
        Self {
            lightweight,
            heavy,
            pacing_delay,
        }
    }

    /// HTTP first, headless Chromium second (or a disabled browser when
    /// `browser_enabled` is off), both bounded by `request_timeout`.
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        let timeout = config.request_timeout();
        let settle = config.render_settle();
        let heavy: Box<dyn FetchStrategy> = if config.browser_enabled {
            Box::new(BrowserStrategy::new(
                ChromiumLauncher::new(config.chromium_path.clone(), timeout),
                timeout,
                settle,
            ))
        } else {
            Box::new(BrowserStrategy::new(DisabledBrowser, timeout, settle))
        };

        Self::new(
            Box::new(HttpStrategy::new(timeout)),
            heavy,
            config.scrape_delay(),
        )
    }

    /// Extracts price, stock, name and currency for `product`.
    ///
    /// Never fails: when neither strategy yields a price the result carries
    /// no price, the original name, `in_stock = false`, and an error
    /// describing each failed attempt.
    pub async fn extract(&self, product: &ProductRef) -> ScrapeResult {
        let store = product.store.unwrap_or_else(|| detect_store(&product.url));
        let url = product.url.as_str();
        tracing::info!(product_id = product.id, %store, url, "extracting product");

        if !self.pacing_delay.is_zero() {
            tracing::debug!(delay_ms = self.pacing_delay.as_millis(), "pacing before fetch");
            tokio::time::sleep(self.pacing_delay).await;
        }

        let mut failures = Vec::with_capacity(2);
        for strategy in [self.lightweight.as_ref(), self.heavy.as_ref()] {
            let kind = strategy.kind();
            match attempt(strategy, url, store).await {
                Ok(page) => {
                    tracing::info!(
                        product_id = product.id,
                        %store,
                        strategy = %kind,
                        price = page.price,
                        currency = %page.currency,
                        in_stock = page.in_stock,
                        "price extracted"
                    );
                    return ScrapeResult::success(
                        product,
                        store,
                        page.name,
                        page.price,
                        page.currency,
                        page.in_stock,
                    );
                }
                Err(err) => {
                    tracing::warn!(
                        product_id = product.id,
                        %store,
                        strategy = %kind,
                        error = %err,
                        "strategy failed"
                    );
                    failures.push(format!("{kind}: {err}"));
                }
            }
        }

        tracing::error!(product_id = product.id, %store, url, "extraction failed via both strategies");
        ScrapeResult::failure(
            product,
            store,
            format!(
                "extraction failed via both strategies ({})",
                failures.join("; ")
            ),
        )
    }
}

#[cfg(test)]
#[path = "extractor_test.rs"]
mod tests;
