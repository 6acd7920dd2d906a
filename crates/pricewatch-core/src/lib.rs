pub mod app_config;
pub mod config;
pub mod products;
pub mod scrape;
pub mod store;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use products::{load_products, ProductRef, ProductsFile};
pub use scrape::ScrapeResult;
pub use store::{ParseStoreError, Store};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read products file {path}: {source}")]
    ProductsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse products file: {0}")]
    ProductsFileParse(#[source] serde_yaml::Error),

    #[error("invalid products file: {0}")]
    Validation(String),
}
