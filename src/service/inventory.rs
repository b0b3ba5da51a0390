use crate::error::Result;
use crate::models::{FridgeItem, MatchedItem, UpsertAction};
use crate::service::receipt_matcher::{normalize_name, Tally};
use chrono::Utc;
use std::future::Future;
use tokio::sync::Mutex;

/// Storage seam used by the receipt flow.
pub trait InventoryStore: Send + Sync {
    /// Catalogued ingredient names followed by fridge item names, in `normalize_name` form.
    fn known_names(&self) -> impl Future<Output = Result<Vec<String>>> + Send;

    /// Adds every tally to the fridge in one atomic step.
    ///
    /// Tally names are in `normalize_name` form. Existing items whose stored name
    /// normalizes to the same text get their quantity increased and
    /// report `Updated`; unknown names are created with the tallied quantity and
    /// report `Added`. On error nothing is applied.
    fn apply_tally(&self, tally: &Tally) -> impl Future<Output = Result<Vec<MatchedItem>>> + Send;
}

/// In-process inventory, used by tests and local runs without a database.
#[derive(Debug, Default)]
pub struct MemoryInventory {
    ingredients: Vec<String>,
    fridge: Mutex<Vec<FridgeItem>>,
}

impl MemoryInventory {
    pub fn new<I, S>(ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ingredients: ingredients.into_iter().map(Into::into).collect(),
            fridge: Mutex::new(Vec::new()),
        }
    }

    /// Seeds a fridge item.
    pub fn with_item(mut self, name: &str, quantity: i64) -> Self {
        let fridge = self.fridge.get_mut();
        let id = fridge.len() as i64 + 1;
        fridge.push(FridgeItem {
            id,
            name: name.to_string(),
            quantity,
            unit: None,
            updated_at: Utc::now(),
        });
        self
    }

    pub async fn items(&self) -> Vec<FridgeItem> {
        self.fridge.lock().await.clone()
    }
}

impl InventoryStore for MemoryInventory {
    async fn known_names(&self) -> Result<Vec<String>> {
        let fridge = self.fridge.lock().await;
        Ok(self
            .ingredients
            .iter()
            .cloned()
            .chain(fridge.iter().map(|item| item.name.clone()))
            .map(|name| normalize_name(&name))
            .collect())
    }

    async fn apply_tally(&self, tally: &Tally) -> Result<Vec<MatchedItem>> {
        let mut fridge = self.fridge.lock().await;
        let mut applied = Vec::with_capacity(tally.len());

        for (name, &count) in tally {
            let count = i64::from(count);
            let existing = fridge
                .iter_mut()
                .find(|item| normalize_name(&item.name) == *name);

            let (action, current_total) = match existing {
                Some(item) => {
                    item.quantity += count;
                    item.updated_at = Utc::now();
                    (UpsertAction::Updated, item.quantity)
                }
                None => {
                    let id = fridge.len() as i64 + 1;
                    fridge.push(FridgeItem {
                        id,
                        name: name.clone(),
                        quantity: count,
                        unit: None,
                        updated_at: Utc::now(),
                    });
                    (UpsertAction::Added, count)
                }
            };

            applied.push(MatchedItem {
                matched_ingredient: name.clone(),
                quantity: count,
                action,
                current_total,
            });
        }

        Ok(applied)
    }
}
