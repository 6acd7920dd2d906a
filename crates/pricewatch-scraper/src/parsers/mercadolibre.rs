use std::sync::LazyLock;

use pricewatch_core::Store;
use regex::Regex;
use scraper::Selector;

use super::{currency_code, currency_from_symbol, name_from, RawExtraction};
use crate::document::{selector, Document};
use crate::normalize::{join_price_parts, normalize_price};

static TITLE_PDP: LazyLock<Selector> = LazyLock::new(|| selector(r#"h1[class*="ui-pdp-title"]"#));
static TITLE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector(r#"h1[class*="item-title"]"#));

/// (integer part, cents) selector pairs. The current price lives on the
/// second line of the price block; the crossed-out list price comes first in
/// document order, so the scoped pair is tried before the page-wide one.
static PRICE_PARTS: LazyLock<[(Selector, Selector); 2]> = LazyLock::new(|| {
    [
        (
            selector(r#".ui-pdp-price__second-line span[class*="andes-money-amount__fraction"]"#),
            selector(r#".ui-pdp-price__second-line span[class*="andes-money-amount__cents"]"#),
        ),
        (
            selector(r#"span[class*="andes-money-amount__fraction"]"#),
            selector(r#"span[class*="andes-money-amount__cents"]"#),
        ),
    ]
});
static PRICE_META: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[itemprop="price"]"#));
static CURRENCY_META: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"meta[itemprop="priceCurrency"]"#));
static CURRENCY_SYMBOL: LazyLock<Selector> =
    LazyLock::new(|| selector(r#"span[class*="andes-money-amount__currency-symbol"]"#));
static OUT_OF_STOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sin stock|agotado|no disponible").expect("valid regex"));

pub(super) fn extract(doc: &Document) -> RawExtraction {
    let mut raw = RawExtraction::for_store(Store::MercadoLibre);

    raw.name = name_from(doc, &[&TITLE_PDP, &TITLE_ITEM]);
    raw.price = price(doc);

    if let Some(code) = doc
        .first_attr(&CURRENCY_META, "content")
        .and_then(|c| currency_code(&c))
    {
        raw.currency = code;
    } else if let Some(code) = doc
        .first_text(&CURRENCY_SYMBOL)
        .and_then(|s| currency_from_symbol(&s))
    {
        raw.currency = code.to_owned();
    }

    if doc.has_text_matching(&OUT_OF_STOCK_RE) {
        raw.in_stock = false;
    }

    raw
}

fn price(doc: &Document) -> Option<f64> {
    PRICE_PARTS
        .iter()
        .find_map(|(whole_sel, cents_sel)| {
            let whole = doc.first_text(whole_sel)?;
            let cents = doc.first_text(cents_sel);
            normalize_price(&join_price_parts(&whole, cents.as_deref())).filter(|p| *p > 0.0)
        })
        .or_else(|| {
            doc.first_attr(&PRICE_META, "content")
                .and_then(|content| normalize_price(&content))
        })
}
