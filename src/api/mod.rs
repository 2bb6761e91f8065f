pub mod handlers;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use crate::service::{LedgerService, ShoppingListService};

/// Shared state for all routes
#[derive(Clone)]
pub struct AppState {
    pub ledger: Arc<LedgerService>,
    pub shopping: Arc<ShoppingListService>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/trips/:trip_id/balances", get(handlers::balances))
        .route("/api/trips/:trip_id/settlements", get(handlers::settlements))
        .route("/api/trips/:trip_id/expenses", post(handlers::create_expense))
        .route("/api/expenses/:expense_id/split/equal", put(handlers::equal_split))
        .route("/api/expenses/:expense_id/split/custom", put(handlers::custom_split))
        .route("/api/trips/:trip_id/shopping-list", get(handlers::shopping_list))
        .route(
            "/api/trips/:trip_id/shopping-list/generate",
            post(handlers::generate_shopping_list),
        )
        .route(
            "/api/trips/:trip_id/shopping-list/items",
            post(handlers::add_manual_item),
        )
        .route(
            "/api/trips/:trip_id/shopping-list/export",
            get(handlers::export_shopping_list),
        )
        .route(
            "/api/shopping-items/:item_id/purchased",
            put(handlers::set_purchased),
        )
        .with_state(state)
}
