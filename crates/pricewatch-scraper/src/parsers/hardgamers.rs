use std::sync::LazyLock;

use pricewatch_core::Store;
use regex::Regex;
use scraper::Selector;

use super::{first_positive_price, name_from, RawExtraction, H1, PRICE_CLASS_RE};
use crate::document::{selector, Document};

static PRODUCT_TITLE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)product.*title|title.*product").expect("valid regex"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| selector("span"));
static PARAGRAPH: LazyLock<Selector> = LazyLock::new(|| selector("p"));
static OUT_OF_STOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)sin stock|agotado").expect("valid regex"));

pub(super) fn extract(doc: &Document) -> RawExtraction {
    let mut raw = RawExtraction::for_store(Store::HardGamers);

    raw.name = doc
        .texts_with_class(&H1, &PRODUCT_TITLE_CLASS_RE)
        .into_iter()
        .find(|t| !t.is_empty())
        .or_else(|| name_from(doc, &[]));

    raw.price = first_positive_price(doc.price_texts_with_class(&SPAN, &PRICE_CLASS_RE))
        .or_else(|| {
            first_positive_price(doc.price_texts_with_class(&PARAGRAPH, &PRICE_CLASS_RE))
        });

    if doc.has_text_matching(&OUT_OF_STOCK_RE) {
        raw.in_stock = false;
    }

    raw
}

#[cfg(test)]
mod tests {
    use super::super::extract_html;
    use super::*;

    #[test]
    fn product_title_class_preferred_over_first_h1() {
        let html = r#"
            <h1 class="site-logo">HardGamers</h1>
            <h1 class="product-title">Placa de Video RTX 4060 8GB</h1>
            <span class="product-price">$ 589.999</span>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert_eq!(raw.name.as_deref(), Some("Placa de Video RTX 4060 8GB"));
        assert_eq!(raw.price, Some(589_999.0));
        assert_eq!(raw.currency, "ARS");
        assert!(raw.in_stock);
    }

    #[test]
    fn first_h1_when_no_product_title_class() {
        let html = r#"<h1>Procesador Ryzen 5 5600</h1><p class="Precio">$ 210.500</p>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert_eq!(raw.name.as_deref(), Some("Procesador Ryzen 5 5600"));
        assert_eq!(raw.price, Some(210_500.0));
    }

    #[test]
    fn span_price_wins_over_paragraph_price() {
        let html = r#"<p class="price">$ 1.000</p><span class="price">$ 2.000</span>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert_eq!(raw.price, Some(2000.0));
    }

    #[test]
    fn price_with_symbol_span_is_read_whole() {
        let html = r#"<h1 class="product-title">Placa de Video RTX 4060</h1>
            <span class="product-price"><span class="price-symbol">$</span> 589.999</span>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert_eq!(raw.price, Some(589_999.0));
    }

    #[test]
    fn zero_price_is_skipped() {
        let html = r#"<span class="price">$ 0</span><span class="price-now">$ 3.500</span>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert_eq!(raw.price, Some(3500.0));
    }

    #[test]
    fn sin_stock_marks_unavailable() {
        let html = r#"<h1>Fuente 650W</h1><span class="price">$ 80.000</span>
            <div class="badge">SIN STOCK</div>"#;
        let raw = extract_html(Store::HardGamers, html);
        assert!(!raw.in_stock);
    }
}
