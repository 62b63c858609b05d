// src/extract/free_text.rs
//! Oldest layout: no price panels at all, just an article paragraph.
//!
//! > … prices are expected to drop to 139.9 cents/litre on July 21, 2025 …
//!
//! The price pattern needs a decimal point, so whole-cent deltas like
//! "fall 2 cents/litre" don't match. This is the only strategy that can
//! date its result.

use std::sync::LazyLock;

use regex::Regex;

use super::{ExtractionResult, Strategy};
use crate::config::Selectors;
use crate::core::html::Dom;
use crate::normalize::find_date_phrase;

static PRICE_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+\.\d+)\s?cents?\s?/\s?lit(?:re|er)").expect("price phrase regex")
});

pub struct FreeText {
    section: String,
}

impl FreeText {
    pub fn new(sel: &Selectors) -> Self {
        Self { section: sel.prose_section.clone() }
    }
}

impl Strategy for FreeText {
    fn name(&self) -> &'static str { "free-text" }

    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult> {
        let section = dom.find_marked(&self.section)?;
        let text = dom.text(section);

        let price = PRICE_PHRASE.captures(&text)?.get(1)?.as_str();
        Some(ExtractionResult {
            raw_price_text: s!(price),
            raw_date_text: find_date_phrase(&text).map(String::from),
            strategy: self.name(),
        })
    }
}
