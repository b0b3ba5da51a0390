use crate::db::queries;
use crate::error::Result;
use crate::models::{MatchedItem, UpsertAction};
use crate::service::{InventoryStore, Tally};
use sqlx::PgPool;

/// Postgres-backed inventory
#[derive(Clone)]
pub struct PgInventory {
    pool: PgPool,
}

impl PgInventory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl InventoryStore for PgInventory {
    async fn known_names(&self) -> Result<Vec<String>> {
        let mut names = queries::list_ingredient_names(&self.pool).await?;
        names.extend(queries::list_fridge_names(&self.pool).await?);
        Ok(names)
    }

    async fn apply_tally(&self, tally: &Tally) -> Result<Vec<MatchedItem>> {
        let start_time = std::time::Instant::now();
        let mut tx = self.pool.begin().await?;
        let mut applied = Vec::with_capacity(tally.len());

        for (name, &count) in tally {
            let count = i64::from(count);

            let (action, current_total) = match queries::lock_fridge_item(&mut tx, name).await? {
                Some(item) => {
                    let total = queries::increment_quantity(&mut tx, item.id, count).await?;
                    (UpsertAction::Updated, total)
                }
                None => {
                    queries::insert_fridge_item(&mut tx, name, count).await?;
                    (UpsertAction::Added, count)
                }
            };

            tracing::debug!("{:?} '{}' by {} -> {}", action, name, count, current_total);
            applied.push(MatchedItem {
                matched_ingredient: name.clone(),
                quantity: count,
                action,
                current_total,
            });
        }

        // Dropping the transaction on any earlier `?` rolls everything back
        tx.commit().await?;
        tracing::info!(
            "✓ Applied {} tallies, elapsed: {:?}",
            applied.len(),
            start_time.elapsed()
        );

        Ok(applied)
    }
}
