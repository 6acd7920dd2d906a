use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::store::Store;
use crate::ConfigError;

/// A product being monitored, as handed to the extraction pipeline.
///
/// The pipeline receives it by reference and never mutates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub url: String,
    /// Known store; detected from the URL when absent.
    #[serde(default)]
    pub store: Option<Store>,
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ProductRef {
    /// An ad-hoc product that is not tracked anywhere yet (id `0`).
    #[must_use]
    pub fn ad_hoc(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            url: url.into(),
            store: None,
            active: true,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ProductsFile {
    pub products: Vec<ProductRef>,
}

impl ProductsFile {
    /// Products that should be checked on the next run.
    pub fn active(&self) -> impl Iterator<Item = &ProductRef> {
        self.products.iter().filter(|p| p.active)
    }
}

/// Load and validate the products file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_products(path: &Path) -> Result<ProductsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ProductsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_products(&content)
}

fn parse_products(content: &str) -> Result<ProductsFile, ConfigError> {
    let products_file: ProductsFile =
        serde_yaml::from_str(content).map_err(ConfigError::ProductsFileParse)?;

    validate_products(&products_file)?;

    Ok(products_file)
}

fn validate_products(products_file: &ProductsFile) -> Result<(), ConfigError> {
    let mut seen_ids = HashSet::new();
    let mut seen_urls = HashSet::new();

    for product in &products_file.products {
        if product.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "product {} has an empty name",
                product.id
            )));
        }

        let url = product.url.trim();
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "product '{}' has a non-http url: '{}'",
                product.name, product.url
            )));
        }

        if !seen_ids.insert(product.id) {
            return Err(ConfigError::Validation(format!(
                "duplicate product id: {}",
                product.id
            )));
        }

        if !seen_urls.insert(url.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate product url: '{}'",
                product.url
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_products_with_defaults() {
        let yaml = r"
products:
  - id: 1
    name: RTX 4060
    url: https://www.hardgamers.com.ar/p/rtx-4060
  - id: 2
    name: Kindle
    url: https://www.amazon.com/dp/B0CFPJYX7P
    store: amazon
    active: false
";
        let file = parse_products(yaml).unwrap();
        assert_eq!(file.products.len(), 2);
        assert!(file.products[0].active);
        assert!(file.products[0].store.is_none());
        assert_eq!(file.products[1].store, Some(Store::Amazon));

        let active: Vec<i64> = file.active().map(|p| p.id).collect();
        assert_eq!(active, vec![1]);
    }

    #[test]
    fn rejects_unknown_store() {
        let yaml = r"
products:
  - id: 1
    name: Thing
    url: https://example.com/thing
    store: ebay
";
        let err = parse_products(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::ProductsFileParse(_)), "{err:?}");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let yaml = r"
products:
  - id: 1
    name: A
    url: https://example.com/a
  - id: 1
    name: B
    url: https://example.com/b
";
        let err = parse_products(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate product id")),
            "{err:?}"
        );
    }

    #[test]
    fn rejects_duplicate_urls_case_insensitively() {
        let yaml = r"
products:
  - id: 1
    name: A
    url: https://Example.com/a
  - id: 2
    name: B
    url: https://example.com/a
";
        let err = parse_products(yaml).unwrap_err();
        assert!(
            matches!(err, ConfigError::Validation(ref msg) if msg.contains("duplicate product url")),
            "{err:?}"
        );
    }

    #[test]
    fn rejects_non_http_url() {
        let yaml = r"
products:
  - id: 1
    name: A
    url: ftp://example.com/a
";
        let err = parse_products(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err:?}");
    }

    #[test]
    fn rejects_empty_name() {
        let yaml = r"
products:
  - id: 1
    name: '  '
    url: https://example.com/a
";
        let err = parse_products(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)), "{err:?}");
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_products(Path::new("/nonexistent/products.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::ProductsFileIo { .. }), "{err:?}");
    }

    #[test]
    fn bundled_sample_file_is_valid() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/products.yaml");
        let file = load_products(&path).unwrap();
        assert!(file.active().count() >= 1);
        assert!(file.active().all(|p| p.active));
    }
}
