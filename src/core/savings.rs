//! Savings aggregation - groups the catalog by product name and prices a cart against it.
//!
//! Everything in this module is pure: it works on slices of models already loaded from
//! the database, so the same code backs the `/cart` view and the checkout snapshot.
//!
//! A name group is every active product whose normalized name matches. For a group with
//! at least two variants the savings of a chosen product are `highest − chosen`, floored
//! at zero. A group with a single variant, or a cart line whose name no longer appears in
//! the catalog, never produces savings.

use crate::{
    core::catalog::normalize_text,
    entities::{cart_item, product},
};
use std::collections::HashMap;

/// Lowest and highest price seen for one product name.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriceRange {
    /// Best (minimum) price in the group
    pub lowest: f64,
    /// Worst (maximum) price in the group
    pub highest: f64,
    /// Number of catalog entries in the group
    pub variants: usize,
}

impl PriceRange {
    fn single(price: f64) -> Self {
        Self {
            lowest: price,
            highest: price,
            variants: 1,
        }
    }

    fn include(&mut self, price: f64) {
        self.lowest = self.lowest.min(price);
        self.highest = self.highest.max(price);
        self.variants += 1;
    }

    /// Per-unit savings of buying at `price` instead of the most expensive variant.
    #[must_use]
    pub fn savings_for(&self, price: f64) -> f64 {
        if self.variants < 2 {
            return 0.0;
        }
        (self.highest - price).max(0.0)
    }
}

/// Price ranges keyed by normalized product name.
pub type PriceGroups = HashMap<String, PriceRange>;

/// Groups products by their normalized name and records the price range of each group.
#[must_use]
pub fn group_prices(products: &[product::Model]) -> PriceGroups {
    let mut groups = PriceGroups::new();
    for product in products {
        groups
            .entry(normalize_text(&product.name))
            .and_modify(|range| range.include(product.price))
            .or_insert_with(|| PriceRange::single(product.price));
    }
    groups
}

/// Per-unit savings for a product called `name` bought at `price`.
#[must_use]
pub fn savings_per_unit(groups: &PriceGroups, name: &str, price: f64) -> f64 {
    groups
        .get(&normalize_text(name))
        .map_or(0.0, |range| range.savings_for(price))
}

/// One cart line priced against the catalog.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// The cart entry itself
    pub item: cart_item::Model,
    /// Cheapest price for this product name
    pub lowest_price: f64,
    /// Most expensive price for this product name
    pub highest_price: f64,
    /// `max(0, highest − price)` for multi-variant groups, otherwise zero
    pub savings_per_unit: f64,
    /// `savings_per_unit × quantity`
    pub total_savings: f64,
    /// `price × quantity`
    pub subtotal: f64,
}

/// Totals for a whole cart.
#[derive(Debug, Clone, Default)]
pub struct CartSummary {
    /// Priced lines in cart order
    pub lines: Vec<CartLine>,
    /// Σ price × quantity
    pub total_spent: f64,
    /// Σ savings per unit × quantity
    pub total_savings: f64,
    /// Σ quantity
    pub item_count: i64,
}

impl CartSummary {
    /// True when there is nothing in the cart.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Prices every cart line against the catalog and accumulates the totals.
#[must_use]
pub fn summarize(cart: &[cart_item::Model], catalog: &[product::Model]) -> CartSummary {
    let groups = group_prices(catalog);
    let mut summary = CartSummary::default();

    for item in cart {
        let range = groups
            .get(&normalize_text(&item.name))
            .copied()
            .unwrap_or_else(|| PriceRange::single(item.price));
        let quantity = f64::from(item.quantity);
        let savings_per_unit = range.savings_for(item.price);
        let line = CartLine {
            lowest_price: range.lowest,
            highest_price: range.highest,
            savings_per_unit,
            total_savings: savings_per_unit * quantity,
            subtotal: item.price * quantity,
            item: item.clone(),
        };

        summary.total_spent += line.subtotal;
        summary.total_savings += line.total_savings;
        summary.item_count += i64::from(item.quantity);
        summary.lines.push(line);
    }

    summary
}
