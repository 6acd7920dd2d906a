//! Parsed HTML handle shared by every store parser.
//!
//! A [`Document`] is built from the HTML either fetch strategy returns and
//! lives only for the duration of one parser call. It is `!Send`, so it must
//! never be held across an `.await`.

use regex::Regex;
use scraper::node::Element;
use scraper::{ElementRef, Html, Selector};

use crate::normalize::normalize_price;

pub struct Document {
    html: Html,
}

impl Document {
    #[must_use]
    pub fn parse(html: &str) -> Self {
        Self {
            html: Html::parse_document(html),
        }
    }

    /// Text of the first element matching `selector` whose text is non-empty.
    #[must_use]
    pub fn first_text(&self, selector: &Selector) -> Option<String> {
        self.html
            .select(selector)
            .map(|el| element_text(&el))
            .find(|text| !text.is_empty())
    }

    /// Non-empty value of `attr` on the first element matching `selector`
    /// that carries it.
    #[must_use]
    pub fn first_attr(&self, selector: &Selector, attr: &str) -> Option<String> {
        self.html
            .select(selector)
            .filter_map(|el| el.value().attr(attr))
            .map(str::trim)
            .find(|value| !value.is_empty())
            .map(str::to_owned)
    }

    #[must_use]
    pub fn contains(&self, selector: &Selector) -> bool {
        self.html.select(selector).next().is_some()
    }

    /// Texts of elements matching `selector` whose `class` attribute matches
    /// `class_pattern`, in document order.
    #[must_use]
    pub fn texts_with_class(&self, selector: &Selector, class_pattern: &Regex) -> Vec<String> {
        self.html
            .select(selector)
            .filter(|el| class_matches(el.value(), class_pattern))
            .map(|el| element_text(&el))
            .collect()
    }

    /// Like [`Document::texts_with_class`], for price lookups.
    ///
    /// A container is skipped only when a class-matching element inside it
    /// already holds a positive price on its own, so a `price-box` wrapping
    /// `price-old` and `price-now` yields the two inner prices rather than
    /// their concatenation. A container whose only matching child is a
    /// currency symbol keeps its full text.
    #[must_use]
    pub fn price_texts_with_class(
        &self,
        selector: &Selector,
        class_pattern: &Regex,
    ) -> Vec<String> {
        self.html
            .select(selector)
            .filter(|el| class_matches(el.value(), class_pattern))
            .filter(|el| {
                !el.descendants()
                    .skip(1)
                    .filter_map(ElementRef::wrap)
                    .filter(|inner| class_matches(inner.value(), class_pattern))
                    .any(|inner| {
                        normalize_price(&element_text(&inner)).is_some_and(|p| p > 0.0)
                    })
            })
            .map(|el| element_text(&el))
            .collect()
    }

    /// Whether any visible text node matches `pattern`. Text inside
    /// `<script>`, `<style>` and `<noscript>` is ignored.
    #[must_use]
    pub fn has_text_matching(&self, pattern: &Regex) -> bool {
        self.html.tree.nodes().any(|node| {
            let Some(text) = node.value().as_text() else {
                return false;
            };
            let in_code = node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|el| matches!(el.name(), "script" | "style" | "noscript"));
            !in_code && pattern.is_match(text)
        })
    }
}

fn class_matches(el: &Element, class_pattern: &Regex) -> bool {
    el.attr("class")
        .is_some_and(|class| class_pattern.is_match(class))
}

/// Descendant text nodes of `el`, each trimmed, joined by a single space.
fn element_text(el: &ElementRef<'_>) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Compiles a CSS selector known at compile time.
///
/// # Panics
///
/// Panics if `css` is not a valid selector; only used for literals.
#[must_use]
pub(crate) fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid selector {css:?}: {e}"))
}
