use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;
use trip_ledger::api::{self, AppState};
use trip_ledger::{create_pool, AppConfig, LedgerService, PgStore, ShoppingListService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .with_max_level(config.log_level())
        .init();

    info!(
        "Starting server on {}:{} (log level {})",
        config.server.host, config.server.port, config.log.level
    );

    let pool = create_pool(&config.database).await?;
    info!("Database pool created");

    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        info!("Migrations applied");
    }

    let store = Arc::new(PgStore::new(pool));
    let state = AppState {
        ledger: Arc::new(LedgerService::new(store.clone())),
        shopping: Arc::new(ShoppingListService::new(store)),
    };
    let app = api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/trips/:trip_id/balances");
    info!("  GET  /api/trips/:trip_id/settlements");
    info!("  PUT  /api/expenses/:expense_id/split/{{equal,custom}}");
    info!("  POST /api/trips/:trip_id/shopping-list/generate");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
