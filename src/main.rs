use pantry_receipts::{api, create_pool, AppConfig, PgInventory, ReceiptMatcher, ReceiptService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logging with local timestamps
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // Database pool
    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    let matcher = ReceiptMatcher::new(config.matcher.clone());
    let receipts = Arc::new(ReceiptService::new(PgInventory::new(pool), matcher));
    let app = api::router(receipts);

    // Start the server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/fridge/parse-receipt      - match receipt text into the fridge");
    info!("  POST /api/grocery-lists/condense    - merge duplicate grocery rows (?format=csv)");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
