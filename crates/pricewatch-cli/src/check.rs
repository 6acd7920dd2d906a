//! Multi-product check runs: bounded concurrent extraction and reporting.

use std::path::Path;

use futures::stream::{self, StreamExt};
use pricewatch_core::{AppConfig, ProductRef, ScrapeResult};
use pricewatch_scraper::Extractor;

/// Loads the products file and extracts every active product once.
///
/// Extraction failures are reported, never propagated; only an unreadable or
/// invalid products file fails the pass.
pub(crate) async fn check_once(
    config: &AppConfig,
    extractor: &Extractor,
    path: &Path,
    json: bool,
) -> anyhow::Result<()> {
    let file = pricewatch_core::load_products(path)?;
    let products: Vec<&ProductRef> = file.active().collect();
    if products.is_empty() {
        tracing::warn!(path = %path.display(), "no active products to check");
        return Ok(());
    }

    tracing::info!(
        count = products.len(),
        max_concurrent = config.max_concurrent,
        "starting check pass"
    );
    let results = run_check(extractor, &products, config.max_concurrent).await;
    print_results(&results, json)?;

    let summary = Summary::of(&results);
    tracing::info!(
        ok = summary.ok,
        failed = summary.failed,
        "check pass finished"
    );
    if !json {
        println!("{summary}");
    }
    Ok(())
}

/// Extracts `products` with at most `max_concurrent` in flight. Results come
/// back ordered by product id.
pub(crate) async fn run_check(
    extractor: &Extractor,
    products: &[&ProductRef],
    max_concurrent: usize,
) -> Vec<ScrapeResult> {
    let mut results: Vec<ScrapeResult> = stream::iter(products.iter().copied())
        .map(|product| extractor.extract(product))
        .buffer_unordered(max_concurrent.max(1))
        .collect()
        .await;
    results.sort_by_key(|r| r.product_id);
    results
}

pub(crate) fn print_results(results: &[ScrapeResult], json: bool) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(results)?);
    } else {
        for result in results {
            println!("{}", format_line(result));
        }
    }
    Ok(())
}

fn format_line(result: &ScrapeResult) -> String {
    let stock = if result.in_stock {
        "in stock"
    } else {
        "out of stock"
    };
    match (result.price, result.error.as_deref()) {
        (Some(price), _) => format!(
            "[ok] #{} {} ({}): {} {price:.2}, {stock}",
            result.product_id, result.name, result.store, result.currency
        ),
        (None, error) => format!(
            "[retry later] #{} {} ({}): {}",
            result.product_id,
            result.name,
            result.store,
            error.unwrap_or("no price")
        ),
    }
}

#[derive(Debug, PartialEq, Eq)]
struct Summary {
    ok: usize,
    failed: usize,
}

impl Summary {
    fn of(results: &[ScrapeResult]) -> Self {
        let ok = results.iter().filter(|r| r.is_success()).count();
        Self {
            ok,
            failed: results.len() - ok,
        }
    }
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "checked {} products: {} ok, {} to retry later",
            self.ok + self.failed,
            self.ok,
            self.failed
        )
    }
}

#[cfg(test)]
#[path = "check_test.rs"]
mod tests;
