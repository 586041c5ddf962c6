use serde::{Deserialize, Serialize};

/// A single recommended clothing or gear item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerItem {
    /// Body zone or role, e.g. "base", "outer", "hands", "safety"
    pub category: String,
    pub item: String,
    pub rationale: String,
}

impl LayerItem {
    #[must_use]
    pub fn new(category: &str, item: &str, rationale: &str) -> Self {
        Self {
            category: category.to_string(),
            item: item.to_string(),
            rationale: rationale.to_string(),
        }
    }
}
