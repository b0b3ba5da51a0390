pub mod handlers;

pub use handlers::*;

use crate::service::{InventoryStore, ReceiptService};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

/// Builds the application router around a receipt service
pub fn router<S>(receipts: Arc<ReceiptService<S>>) -> Router
where
    S: InventoryStore + 'static,
{
    let receipt_routes = Router::new()
        .route("/api/fridge/parse-receipt", post(handlers::parse_receipt::<S>))
        .with_state(receipts);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/grocery-lists/condense", post(handlers::condense_grocery_list))
        .merge(receipt_routes)
}
