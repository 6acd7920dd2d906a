use std::sync::LazyLock;

use pricewatch_core::Store;
use regex::Regex;
use scraper::Selector;

use super::{currency_from_symbol, name_from, RawExtraction};
use crate::document::{selector, Document};
use crate::normalize::{join_price_parts, normalize_price, trim_trailing_separator};

static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("span#productTitle"));

/// Price candidates in the order Amazon layouts have used them.
static PRICE_CANDIDATES: LazyLock<[Selector; 4]> = LazyLock::new(|| {
    [
        selector("span#priceblock_ourprice"),
        selector("span#priceblock_dealprice"),
        selector(r#"span[class*="a-price-whole"]"#),
        selector("span#price_inside_buybox"),
    ]
});
static PRICE_FRACTION: LazyLock<Selector> = LazyLock::new(|| selector("span.a-price-fraction"));
static PRICE_SYMBOL: LazyLock<Selector> = LazyLock::new(|| selector("span.a-price-symbol"));
static OUT_OF_STOCK: LazyLock<Selector> = LazyLock::new(|| selector("#outOfStock"));
static OUT_OF_STOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)unavailable|out of stock").expect("valid regex"));

pub(super) fn extract(doc: &Document) -> RawExtraction {
    let mut raw = RawExtraction::for_store(Store::Amazon);

    raw.name = name_from(doc, &[&TITLE]);
    raw.price = price(doc);

    if doc.contains(&OUT_OF_STOCK) || doc.has_text_matching(&OUT_OF_STOCK_RE) {
        raw.in_stock = false;
    }

    if let Some(symbol) = doc.first_text(&PRICE_SYMBOL) {
        if symbol.contains('$') {
            raw.currency = "USD".to_owned();
        } else if let Some(code) = currency_from_symbol(&symbol) {
            raw.currency = code.to_owned();
        }
    }

    raw
}

fn price(doc: &Document) -> Option<f64> {
    PRICE_CANDIDATES.iter().find_map(|sel| {
        let text = doc.first_text(sel)?;
        // `a-price-whole` renders as "1,234." with the cents in a sibling span.
        let whole = trim_trailing_separator(&text);
        let has_own_decimals = whole.len() == text.trim().len() && whole.contains('.');
        let fraction = if has_own_decimals {
            None
        } else {
            doc.first_text(&PRICE_FRACTION)
        };
        normalize_price(&join_price_parts(&text, fraction.as_deref())).filter(|p| *p > 0.0)
    })
}
