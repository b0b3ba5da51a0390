use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Fridge inventory row (fridge_item)
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct FridgeItem {
    pub id: i64,
    pub name: String,
    pub quantity: i64,
    pub unit: Option<String>,
    pub updated_at: DateTime<Utc>,
}
