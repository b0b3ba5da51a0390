use serde::{Deserialize, Serialize};

/// Whether a tally landed on an existing fridge item or created one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpsertAction {
    Updated,
    Added,
}

/// One applied tally entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedItem {
    pub matched_ingredient: String,
    pub quantity: i64,
    pub action: UpsertAction,
    pub current_total: i64,
}

/// Response of a receipt parse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptReport {
    pub matched_items: Vec<MatchedItem>,
    pub unmatched_items: Vec<String>,
    pub total_matches: usize,
}

impl ReceiptReport {
    pub fn new(matched_items: Vec<MatchedItem>, unmatched_items: Vec<String>) -> Self {
        let total_matches = matched_items.len();
        Self {
            matched_items,
            unmatched_items,
            total_matches,
        }
    }
}
