//! Store detection from a product URL.

use pricewatch_core::Store;

/// Substring predicates in priority order; the first match wins.
const STORE_PATTERNS: &[(&[&str], Store)] = &[
    (&["mercadolibre", "meli"], Store::MercadoLibre),
    (&["amazon"], Store::Amazon),
    (&["hardgamers"], Store::HardGamers),
    (&["garbarino"], Store::Garbarino),
    (&["fravega"], Store::Fravega),
    (&["musimundo"], Store::Musimundo),
    (&["fullh4rd"], Store::FullH4rd),
];

/// Resolves the store a URL belongs to. Never fails: unknown sites are
/// [`Store::Generic`].
#[must_use]
pub fn detect_store(url: &str) -> Store {
    let lower = url.to_lowercase();
    STORE_PATTERNS
        .iter()
        .find(|(needles, _)| needles.iter().any(|n| lower.contains(n)))
        .map_or(Store::Generic, |(_, store)| *store)
}
