use crate::error::PantryError;
use crate::models::{CondensedRow, GroceryEntry};
use crate::service::{condenser, GroceryListCondenser, InventoryStore, ReceiptService};
use axum::{
    extract::{rejection::JsonRejection, Json, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Request body: raw receipt text
#[derive(Debug, Deserialize)]
pub struct ParseReceiptRequest {
    pub receipt_text: String,
}

/// Request body: grocery list rows to condense
#[derive(Debug, Deserialize)]
pub struct CondenseRequest {
    pub items: Vec<GroceryEntry>,
}

#[derive(Debug, Deserialize)]
pub struct CondenseQuery {
    #[serde(default)]
    pub format: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CondenseResponse {
    pub rows: Vec<CondensedRow>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(ErrorResponse { error: message })).into_response()
}

impl IntoResponse for PantryError {
    fn into_response(self) -> Response {
        let status = match self {
            PantryError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        error_response(status, self.to_string())
    }
}

/// Health check
pub async fn health_check() -> &'static str {
    "OK"
}

/// Matches receipt text against the inventory and applies the tally
pub async fn parse_receipt<S: InventoryStore>(
    State(service): State<Arc<ReceiptService<S>>>,
    payload: Result<Json<ParseReceiptRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::warn!("Rejected receipt request: {}", rejection.body_text());
            return PantryError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    match service.parse_receipt(&req.receipt_text).await {
        Ok(report) => (StatusCode::OK, Json(report)).into_response(),
        Err(e) => {
            tracing::error!("Error in parse_receipt: {}", e);
            e.into_response()
        }
    }
}

/// Condenses a grocery list, as JSON or `?format=csv`
pub async fn condense_grocery_list(
    Query(query): Query<CondenseQuery>,
    payload: Result<Json<CondenseRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return PantryError::InvalidRequest(rejection.body_text()).into_response();
        }
    };

    let rows = GroceryListCondenser.condense(&req.items);

    match query.format.as_deref() {
        None | Some("json") => (StatusCode::OK, Json(CondenseResponse { rows })).into_response(),
        Some("csv") => {
            let mut body = Vec::new();
            match condenser::write_csv(&rows, &mut body) {
                Ok(()) => (
                    StatusCode::OK,
                    [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
                    body,
                )
                    .into_response(),
                Err(e) => {
                    tracing::error!("CSV export failed: {}", e);
                    e.into_response()
                }
            }
        }
        Some(other) => {
            PantryError::InvalidRequest(format!("unsupported format '{}'", other)).into_response()
        }
    }
}
