//! Per-store extraction rules.
//!
//! Dispatch is a closed `match` over [`Store`]: stores without dedicated
//! markup rules fall through to [`generic`] at compile time. Parsers never
//! fail; a field they cannot locate is simply left empty.

mod amazon;
mod generic;
mod hardgamers;
mod mercadolibre;

use std::sync::LazyLock;

use pricewatch_core::Store;
use regex::Regex;
use scraper::Selector;

use crate::document::{selector, Document};
use crate::normalize::normalize_price;

/// What a parser found on one page. Lives only inside a single extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct RawExtraction {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub currency: String,
    pub in_stock: bool,
}

impl RawExtraction {
    /// Empty extraction: no name, no price, store currency, in stock.
    fn for_store(store: Store) -> Self {
        Self {
            name: None,
            price: None,
            currency: store.default_currency().to_owned(),
            in_stock: true,
        }
    }

    /// The price, if one was found and is positive.
    #[must_use]
    pub fn usable_price(&self) -> Option<f64> {
        self.price.filter(|p| *p > 0.0)
    }
}

/// Runs the parser registered for `store` over `doc`.
#[must_use]
pub fn extract(store: Store, doc: &Document) -> RawExtraction {
    match store {
        Store::MercadoLibre => mercadolibre::extract(doc),
        Store::Amazon => amazon::extract(doc),
        Store::HardGamers => hardgamers::extract(doc),
        Store::Garbarino
        | Store::Fravega
        | Store::Musimundo
        | Store::FullH4rd
        | Store::Generic => generic::extract(doc, store),
    }
}

/// Parses `html` and runs the parser for `store`. The parsed document is
/// dropped before returning.
#[must_use]
pub fn extract_html(store: Store, html: &str) -> RawExtraction {
    let doc = Document::parse(html);
    extract(store, &doc)
}

static OG_TITLE: LazyLock<Selector> = LazyLock::new(|| selector(r#"meta[property="og:title"]"#));
static H1: LazyLock<Selector> = LazyLock::new(|| selector("h1"));
static PRICE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)price|precio").expect("valid regex"));

/// Name from the first non-empty candidate, then the first `<h1>`, then
/// `og:title`.
fn name_from(doc: &Document, candidates: &[&Selector]) -> Option<String> {
    candidates
        .iter()
        .find_map(|sel| doc.first_text(sel))
        .or_else(|| doc.first_text(&H1))
        .or_else(|| doc.first_attr(&OG_TITLE, "content"))
}

/// First positive price among texts, in order.
fn first_positive_price<I>(texts: I) -> Option<f64>
where
    I: IntoIterator<Item = String>,
{
    texts
        .into_iter()
        .filter_map(|text| normalize_price(&text))
        .find(|price| *price > 0.0)
}

/// Maps a rendered currency symbol to an ISO code. A bare `$` is ambiguous
/// and left to the store default.
fn currency_from_symbol(symbol: &str) -> Option<&'static str> {
    let upper = symbol.trim().to_uppercase();
    if upper.contains("US$") || upper.contains("U$S") || upper.contains("USD") {
        Some("USD")
    } else if upper.contains('€') || upper.contains("EUR") {
        Some("EUR")
    } else if upper.contains("R$") || upper.contains("BRL") {
        Some("BRL")
    } else if upper.contains("ARS") {
        Some("ARS")
    } else {
        None
    }
}

/// Accepts an explicit ISO-looking currency code from page metadata.
fn currency_code(raw: &str) -> Option<String> {
    let code = raw.trim().to_ascii_uppercase();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())).then_some(code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_routes_regional_stores_to_generic_rules() {
        let html = r#"<html><head>
            <meta property="og:title" content="Heladera No Frost">
            <meta property="product:price:amount" content="899999.00">
            </head><body></body></html>"#;
        for store in [
            Store::Garbarino,
            Store::Fravega,
            Store::Musimundo,
            Store::FullH4rd,
            Store::Generic,
        ] {
            let raw = extract_html(store, html);
            assert_eq!(raw.name.as_deref(), Some("Heladera No Frost"), "{store}");
            assert_eq!(raw.price, Some(899_999.0), "{store}");
            assert_eq!(raw.currency, "ARS", "{store}");
            assert!(raw.in_stock, "{store}");
        }
    }

    #[test]
    fn empty_document_yields_empty_extraction() {
        for store in Store::ALL {
            let raw = extract_html(store, "<html><body></body></html>");
            assert!(raw.name.is_none(), "{store}");
            assert!(raw.price.is_none(), "{store}");
            assert!(raw.in_stock, "{store}");
            assert_eq!(raw.currency, store.default_currency(), "{store}");
        }
    }

    #[test]
    fn usable_price_rejects_zero() {
        let mut raw = RawExtraction::for_store(Store::Generic);
        raw.price = Some(0.0);
        assert!(raw.usable_price().is_none());
        raw.price = Some(12.5);
        assert_eq!(raw.usable_price(), Some(12.5));
    }

    #[test]
    fn currency_symbols() {
        assert_eq!(currency_from_symbol("US$"), Some("USD"));
        assert_eq!(currency_from_symbol("U$S"), Some("USD"));
        assert_eq!(currency_from_symbol("€"), Some("EUR"));
        assert_eq!(currency_from_symbol("$"), None);
    }

    #[test]
    fn currency_code_validation() {
        assert_eq!(currency_code(" ars ").as_deref(), Some("ARS"));
        assert!(currency_code("pesos").is_none());
        assert!(currency_code("").is_none());
    }
}
