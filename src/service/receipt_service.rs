use crate::error::Result;
use crate::models::ReceiptReport;
use crate::service::inventory::InventoryStore;
use crate::service::receipt_matcher::{ReceiptMatcher, Vocabulary};

/// Receipt parsing flow: vocabulary lookup, matching, tally application.
pub struct ReceiptService<S> {
    store: S,
    matcher: ReceiptMatcher,
}

impl<S: InventoryStore> ReceiptService<S> {
    pub fn new(store: S, matcher: ReceiptMatcher) -> Self {
        Self { store, matcher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn parse_receipt(&self, receipt_text: &str) -> Result<ReceiptReport> {
        // 1. Vocabulary from the current inventory
        let vocabulary: Vocabulary = self.store.known_names().await?.into_iter().collect();
        tracing::info!(
            "Parsing receipt: {} lines, {} known names",
            receipt_text.lines().count(),
            vocabulary.len()
        );

        // 2. Pure matching
        let outcome = self.matcher.match_receipt(receipt_text, &vocabulary);
        if outcome.truncated {
            tracing::warn!("Receipt matching was cut short by the comparison budget");
        }

        // 3. Apply all tallies in one step
        let matched_items = if outcome.matched.is_empty() {
            Vec::new()
        } else {
            self.store.apply_tally(&outcome.matched).await?
        };

        let report = ReceiptReport::new(matched_items, outcome.unmatched);
        tracing::info!(
            "Receipt parsed: {} items matched, {} unmatched",
            report.total_matches,
            report.unmatched_items.len()
        );

        Ok(report)
    }
}
