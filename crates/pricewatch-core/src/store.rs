//! Store identifiers for the e-commerce sites the pipeline understands.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A distinguishable e-commerce website family.
///
/// Every URL resolves to one of these; unknown sites are [`Store::Generic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Store {
    MercadoLibre,
    Amazon,
    HardGamers,
    Garbarino,
    Fravega,
    Musimundo,
    FullH4rd,
    Generic,
}

impl Store {
    pub const ALL: [Store; 8] = [
        Store::MercadoLibre,
        Store::Amazon,
        Store::HardGamers,
        Store::Garbarino,
        Store::Fravega,
        Store::Musimundo,
        Store::FullH4rd,
        Store::Generic,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Store::MercadoLibre => "mercadolibre",
            Store::Amazon => "amazon",
            Store::HardGamers => "hardgamers",
            Store::Garbarino => "garbarino",
            Store::Fravega => "fravega",
            Store::Musimundo => "musimundo",
            Store::FullH4rd => "fullh4rd",
            Store::Generic => "generic",
        }
    }

    /// Currency assumed when a page carries no explicit currency signal.
    ///
    /// Amazon listings are international and priced in dollars; every other
    /// store in scope is Argentine.
    #[must_use]
    pub fn default_currency(self) -> &'static str {
        match self {
            Store::Amazon => "USD",
            _ => "ARS",
        }
    }
}

impl std::fmt::Display for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown store \"{0}\"")]
pub struct ParseStoreError(pub String);

impl std::str::FromStr for Store {
    type Err = ParseStoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Store::ALL
            .into_iter()
            .find(|store| store.as_str() == lower)
            .ok_or_else(|| ParseStoreError(s.to_owned()))
    }
}
