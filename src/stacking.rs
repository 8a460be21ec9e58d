//! Stacking-order resolution.
//!
//! The consumer composites one image per category, back to front, in the
//! order the categories are emitted. That order comes from the layer index
//! each category path carries (`face#2` draws above `body#1`).
//!
//! The index is only meaningful when every category has one. A tree where
//! some directory lacks it (backgrounds, or a half-converted part set) is
//! left in discovery order rather than partially sorted.

use crate::scan::Category;
use serde::Serialize;
use std::fmt;

/// Which ordering was applied to a run's categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StackingOrder {
    /// Sorted ascending by layer index.
    Layered,
    /// At least one category had no layer index; scan order kept.
    Discovery,
}

impl fmt::Display for StackingOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StackingOrder::Layered => write!(f, "layered"),
            StackingOrder::Discovery => write!(f, "discovery"),
        }
    }
}

/// Order categories for emission.
///
/// Sorting is stable: categories sharing a layer index keep their
/// discovery order.
pub fn resolve(mut categories: Vec<Category>) -> (Vec<Category>, StackingOrder) {
    if categories.iter().any(|c| c.layer_index.is_none()) {
        return (categories, StackingOrder::Discovery);
    }
    categories.sort_by_key(|c| c.layer_index);
    (categories, StackingOrder::Layered)
}
