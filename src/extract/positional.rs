// src/extract/positional.rs
//! First `<h2>` carrying a `¢` is taken to be tomorrow's price.
//!
//! This leans on the page listing the "tomorrow" panel before "today", which
//! nothing in the markup guarantees. If the order ever flips this silently
//! returns today's price, so it sits below both card strategies. Don't make
//! it smarter without a current page to check against.

use super::{ExtractionResult, Strategy, has_unit};
use crate::config::Selectors;
use crate::core::html::Dom;

pub struct Positional {
    heading: String,
}

impl Positional {
    pub fn new(sel: &Selectors) -> Self {
        Self { heading: sel.price_heading.clone() }
    }
}

impl Strategy for Positional {
    fn name(&self) -> &'static str { "positional" }

    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult> {
        dom.find_all(&self.heading)
            .map(|h| dom.text(h))
            .find(|t| has_unit(t))
            .map(|price| ExtractionResult::price_only(self.name(), price))
    }
}
