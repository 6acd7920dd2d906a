use serde::{Deserialize, Serialize};

use crate::products::ProductRef;
use crate::store::Store;

/// Output of one extraction call.
///
/// [`ScrapeResult::success`] and [`ScrapeResult::failure`] keep `price` and
/// `error` mutually exclusive, with a non-empty error text. Fields are public
/// and the type deserializes, so values built any other way are not checked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub product_id: i64,
    /// Name found on the page, or the caller's name when the page had none.
    pub name: String,
    pub url: String,
    pub store: Store,
    pub price: Option<f64>,
    /// ISO 4217 currency code, e.g. `"ARS"`.
    pub currency: String,
    pub in_stock: bool,
    pub error: Option<String>,
}

impl ScrapeResult {
    /// Builds a successful result. An empty `name` falls back to the
    /// product's known name.
    #[must_use]
    pub fn success(
        product: &ProductRef,
        store: Store,
        name: Option<String>,
        price: f64,
        currency: String,
        in_stock: bool,
    ) -> Self {
        let name = name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| product.name.clone());
        Self {
            product_id: product.id,
            name,
            url: product.url.clone(),
            store,
            price: Some(price),
            currency,
            in_stock,
            error: None,
        }
    }

    /// Builds a failed result: no price, original name, out of stock.
    #[must_use]
    pub fn failure(product: &ProductRef, store: Store, error: impl Into<String>) -> Self {
        let mut error = error.into();
        if error.trim().is_empty() {
            error = "extraction failed".to_owned();
        }
        Self {
            product_id: product.id,
            name: product.name.clone(),
            url: product.url.clone(),
            store,
            price: None,
            currency: store.default_currency().to_owned(),
            in_stock: false,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.price.is_some()
    }
}
