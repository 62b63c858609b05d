// src/extract/proximity.rs
//! Start from the word "tomorrow" wherever it appears and look around it.
//!
//! For each element whose own text mentions the token (document order), the
//! element's subtree is searched first, then its parent's, then its
//! grandparent's, for an `<h2>` carrying `¢`. Going further up would reach
//! page-wide wrappers and pick up unrelated prices.

use super::{ExtractionResult, Strategy, has_unit};
use crate::config::Selectors;
use crate::core::html::Dom;
use crate::core::sanitize::contains_ci;

const MAX_ANCESTOR_HOPS: usize = 2;

pub struct Proximity {
    token: String,
    heading: String,
}

impl Proximity {
    pub fn new(sel: &Selectors) -> Self {
        Self {
            token: sel.tomorrow_token.clone(),
            heading: sel.price_heading.clone(),
        }
    }

    fn price_near(&self, dom: &Dom<'_>, hit: usize) -> Option<String> {
        std::iter::once(hit)
            .chain(dom.ancestors(hit).take(MAX_ANCESTOR_HOPS))
            .find_map(|scope| {
                dom.find_within(scope, &self.heading)
                    .map(|h| dom.text(h))
                    .find(|t| has_unit(t))
            })
    }
}

impl Strategy for Proximity {
    fn name(&self) -> &'static str { "proximity" }

    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult> {
        (0..dom.len())
            .filter(|&i| contains_ci(&dom.own_text(i), &self.token))
            .find_map(|hit| self.price_near(dom, hit))
            .map(|price| ExtractionResult::price_only(self.name(), price))
    }
}
