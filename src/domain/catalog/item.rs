//! Course item - a single purchasable catalog entry.

use serde::{Deserialize, Serialize};

/// A purchasable course.
///
/// Immutable once loaded. The `id` is the primary key used by purchase
/// records and operation arguments; all other fields feed agent
/// instruction text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CourseItem {
    /// Stable identifier (e.g., "prompt_engineering_deep_dive").
    pub id: String,

    /// Display name shown to users.
    pub name: String,

    /// Price in whole dollars. Always positive.
    pub price: u32,

    /// One-line pitch used by the sales agent.
    pub value_proposition: String,

    /// What the purchase includes (coaching, templates, ...).
    pub includes: String,

    /// Section outline used by the course support agent.
    pub sections: String,
}

impl CourseItem {
    /// Renders the item as a catalog listing block for instruction text.
    pub fn render_listing(&self) -> String {
        format!(
            "- Name: {}\n  ID: {}\n  Price: ${}\n  Value Proposition: {}\n  Includes: {}",
            self.name, self.id, self.price, self.value_proposition, self.includes
        )
    }
}
