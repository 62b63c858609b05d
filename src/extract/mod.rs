// src/extract/mod.rs
//! # Reading the gas price page
//!
//! The page has been redesigned several times, and every layout we have seen
//! is encoded here as one [`Strategy`]. [`Extractor::extract`] runs them in a
//! fixed priority order against one parsed [`Dom`] and returns the first hit.
//! Strategies are never combined or voted.
//!
//! | # | Strategy | Looks for |
//! |---|---|---|
//! | 1 | [`StructuredCard`] | `.price-card` with a "Tomorrow" heading → its `<h2>` |
//! | 2 | [`ScopedCard`] | inside `#gas-prices`: any block with a direct "Tomorrow" heading → its `<h2>` |
//! | 3 | [`Positional`] | first `<h2>` on the page containing `¢` |
//! | 4 | [`Proximity`] | text "tomorrow", then up to two ancestors for an `<h2>` with `¢` |
//! | 5 | [`FreeText`] | `.entry-content` prose: `139.9 cents/litre` … `on July 21, 2025` |
//!
//! Only the free-text strategy can date its result; the others yield a bare
//! price and the normalizer dates it "tomorrow".
//!
//! Markers (class names, token, heading tag) come from
//! [`Selectors`](crate::config::Selectors), so a renamed class is a config
//! change, not a code change.
//!
//! Nothing here does I/O. Every strategy can be exercised on a saved page.

mod card;
mod free_text;
mod positional;
mod proximity;

pub use card::{ScopedCard, StructuredCard};
pub use free_text::FreeText;
pub use positional::Positional;
pub use proximity::Proximity;

use tracing::{debug, info};

use crate::config::Selectors;
use crate::config::consts::CENT_SIGN;
use crate::core::html::Dom;
use crate::core::sanitize::contains_ci;
use crate::error::ScrapeError;

/// Raw strings found on the page; not yet validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    pub raw_price_text: String,
    pub raw_date_text: Option<String>,
    /// Name of the strategy that matched.
    pub strategy: &'static str,
}

impl ExtractionResult {
    pub fn price_only(strategy: &'static str, raw_price_text: impl Into<String>) -> Self {
        Self { raw_price_text: raw_price_text.into(), raw_date_text: None, strategy }
    }
}

/// One heuristic for locating the price in a page.
pub trait Strategy {
    fn name(&self) -> &'static str;

    /// `None` means "this layout isn't here", not an error.
    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult>;
}

pub struct Extractor {
    strategies: Vec<Box<dyn Strategy>>,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&Selectors::default())
    }
}

impl Extractor {
    /// The standard chain, highest priority first.
    pub fn new(sel: &Selectors) -> Self {
        Self::with_strategies(vec![
            Box::new(StructuredCard::new(sel)),
            Box::new(ScopedCard::new(sel)),
            Box::new(Positional::new(sel)),
            Box::new(Proximity::new(sel)),
            Box::new(FreeText::new(sel)),
        ])
    }

    pub fn with_strategies(strategies: Vec<Box<dyn Strategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    pub fn extract(&self, document: &str) -> Result<ExtractionResult, ScrapeError> {
        let dom = Dom::parse(document);
        debug!("Parsed {} elements from {} bytes", dom.len(), document.len());

        for s in &self.strategies {
            match s.attempt(&dom) {
                Some(found) => {
                    info!("Strategy '{}' matched: {:?}", s.name(), found.raw_price_text);
                    return Ok(found);
                }
                None => debug!("Strategy '{}': no match", s.name()),
            }
        }
        Err(ScrapeError::NoPriceFound { tried: self.strategies.len() })
    }
}

/* ---------------- shared helpers ---------------- */

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

/// A heading (other than the price heading itself) whose text has `token`.
fn is_label(dom: &Dom<'_>, idx: usize, token: &str, price_heading: &str) -> bool {
    let tag = dom.get(idx).tag.as_str();
    is_heading(tag) && !tag.eq_ignore_ascii_case(price_heading) && contains_ci(&dom.text(idx), token)
}

fn has_unit(text: &str) -> bool {
    text.contains(CENT_SIGN)
}

/// First non-empty price heading inside `scope`.
fn first_heading_text(dom: &Dom<'_>, scope: usize, heading: &str) -> Option<String> {
    dom.find_within(scope, heading)
        .map(|h| dom.text(h))
        .find(|t| !t.is_empty())
}
