// src/extract/card.rs
//! Card layouts: a block labelled "Tomorrow" by a small heading, with the
//! price in a large heading inside the same block.
//!
//! ```html
//! <div class="price-card">
//!   <h3>Tomorrow</h3>
//!   <h2>139.9¢</h2>
//! </div>
//! ```

use super::{ExtractionResult, Strategy, first_heading_text, is_label};
use crate::config::Selectors;
use crate::core::html::Dom;

/// Any element classed as a price card, anywhere on the page.
pub struct StructuredCard {
    card_class: String,
    token: String,
    heading: String,
}

impl StructuredCard {
    pub fn new(sel: &Selectors) -> Self {
        Self {
            card_class: sel.card_class.clone(),
            token: sel.tomorrow_token.clone(),
            heading: sel.price_heading.clone(),
        }
    }
}

impl Strategy for StructuredCard {
    fn name(&self) -> &'static str { "structured-card" }

    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult> {
        (0..dom.len())
            .filter(|&i| dom.get(i).has_class(&self.card_class))
            .filter(|&card| dom.descendants(card).any(|d| is_label(dom, d, &self.token, &self.heading)))
            .find_map(|card| first_heading_text(dom, card, &self.heading))
            .map(|price| ExtractionResult::price_only(self.name(), price))
    }
}

/// Same shape, but only inside the named prices container. Cards there need
/// no class: any block whose *direct* child heading says "Tomorrow" counts,
/// which is only safe because the search is scoped.
pub struct ScopedCard {
    container: String,
    token: String,
    heading: String,
}

impl ScopedCard {
    pub fn new(sel: &Selectors) -> Self {
        Self {
            container: sel.prices_container.clone(),
            token: sel.tomorrow_token.clone(),
            heading: sel.price_heading.clone(),
        }
    }
}

impl Strategy for ScopedCard {
    fn name(&self) -> &'static str { "scoped-container" }

    fn attempt(&self, dom: &Dom<'_>) -> Option<ExtractionResult> {
        let scope = dom.find_marked(&self.container)?;
        std::iter::once(scope)
            .chain(dom.descendants(scope))
            .filter(|&el| dom.get(el).children.iter().any(|&c| is_label(dom, c, &self.token, &self.heading)))
            .find_map(|card| first_heading_text(dom, card, &self.heading))
            .map(|price| ExtractionResult::price_only(self.name(), price))
    }
}
