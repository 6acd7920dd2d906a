//! Best-effort rules for stores without dedicated markup knowledge.
//!
//! Precision on unseen markup is not guaranteed: the first positive number
//! inside a "price"-classed element is taken as the price.

use std::sync::LazyLock;

use pricewatch_core::Store;
use regex::Regex;
use scraper::Selector;

use super::{currency_code, first_positive_price, RawExtraction, H1, OG_TITLE, PRICE_CLASS_RE};
use crate::document::{selector, Document};
use crate::normalize::normalize_price;

static PRICE_META: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        selector(r#"meta[property="product:price:amount"]"#),
        selector(r#"meta[property="og:price:amount"]"#),
        selector(r#"meta[itemprop="price"], [itemprop="price"][content]"#),
    ]
});
static CURRENCY_META: LazyLock<[Selector; 3]> = LazyLock::new(|| {
    [
        selector(r#"meta[property="product:price:currency"]"#),
        selector(r#"meta[property="og:price:currency"]"#),
        selector(r#"[itemprop="priceCurrency"][content]"#),
    ]
});
static ANY_CLASSED: LazyLock<Selector> = LazyLock::new(|| selector("body [class]"));
static AVAILABILITY: LazyLock<Selector> = LazyLock::new(|| selector(r#"[itemprop="availability"]"#));
static OUT_OF_STOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)sin stock|agotado|no disponible|out of stock|unavailable")
        .expect("valid regex")
});

pub(super) fn extract(doc: &Document, store: Store) -> RawExtraction {
    let mut raw = RawExtraction::for_store(store);

    raw.name = doc
        .first_attr(&OG_TITLE, "content")
        .or_else(|| doc.first_text(&H1));

    raw.price = PRICE_META
        .iter()
        .find_map(|sel| {
            doc.first_attr(sel, "content")
                .and_then(|content| normalize_price(&content))
                .filter(|p| *p > 0.0)
        })
        .or_else(|| {
            first_positive_price(doc.price_texts_with_class(&ANY_CLASSED, &PRICE_CLASS_RE))
        });

    if let Some(code) = CURRENCY_META
        .iter()
        .find_map(|sel| doc.first_attr(sel, "content"))
        .and_then(|c| currency_code(&c))
    {
        raw.currency = code;
    }

    if declared_out_of_stock(doc) || doc.has_text_matching(&OUT_OF_STOCK_RE) {
        raw.in_stock = false;
    }

    raw
}

/// Schema.org microdata such as `<link itemprop="availability" href="https://schema.org/OutOfStock">`.
fn declared_out_of_stock(doc: &Document) -> bool {
    ["href", "content"].iter().any(|attr| {
        doc.first_attr(&AVAILABILITY, attr)
            .is_some_and(|v| v.to_ascii_lowercase().contains("outofstock"))
    })
}
