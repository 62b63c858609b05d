// src/config/options.rs
//! Run options, layered: built-in defaults ← TOML file ← `GAS_SCRAPE_*` env.
//!
//! Every section is `#[serde(default)]`, so a config file only needs the keys
//! it wants to change:
//!
//! ```toml
//! [store]
//! data_file = "data/gas_prices.json"
//!
//! [selectors]
//! card_class = "gas-card"
//! ```
//!
//! Environment keys use `__` between section and key, e.g.
//! `GAS_SCRAPE_SOURCE__URL=https://…`.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::consts::*;
use crate::error::ScrapeError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppOptions {
    pub source: SourceOptions,
    pub store: StoreOptions,
    pub selectors: Selectors,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SourceOptions {
    pub url: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Save each fetched page here before extraction.
    pub dump_dir: Option<PathBuf>,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            url: s!(SOURCE_URL),
            user_agent: s!(USER_AGENT),
            timeout_secs: FETCH_TIMEOUT_SECS,
            dump_dir: None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StoreOptions {
    pub data_file: PathBuf,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self { data_file: PathBuf::from(DATA_FILE) }
    }
}

/// Where the extraction strategies look. Site redesigns usually only need
/// these changed.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Selectors {
    pub card_class: String,
    pub prices_container: String,
    pub prose_section: String,
    pub tomorrow_token: String,
    pub price_heading: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            card_class: s!(CARD_CLASS),
            prices_container: s!(PRICES_CONTAINER),
            prose_section: s!(PROSE_SECTION),
            tomorrow_token: s!(TOMORROW_TOKEN),
            price_heading: s!(PRICE_HEADING),
        }
    }
}

impl AppOptions {
    /// Load options. An explicit `path` must exist; without one,
    /// `gas_scrape.toml` in the working directory is used if present.
    pub fn load(path: Option<&Path>) -> Result<Self, ScrapeError> {
        let file = match path {
            Some(p) => ::config::File::from(p).required(true),
            None => ::config::File::from(Path::new(CONFIG_FILE)).required(false),
        };

        let opts = ::config::Config::builder()
            .add_source(file)
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;
        Ok(opts)
    }
}
