// src/lib.rs
//! Tracks the daily "tomorrow" gas price prediction published on a web page
//! as a deduplicated, date-ordered JSON series.
//!
//! ```text
//! page ─► extract::Extractor ─► normalize ─► store::merge ─► gas_prices.json
//! ```

#[macro_use]
pub mod macros;

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod file;
pub mod log;
pub mod normalize;
pub mod runner;
pub mod store;

pub use error::ScrapeError;
pub use extract::{ExtractionResult, Extractor};
pub use store::{Observation, Series};
