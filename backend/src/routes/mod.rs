//! Route definitions for the Restaurant Inventory Management Platform
//!
//! Reads are open; every mutating route requires the X-Actor-Id header so
//! the ledger can attribute each movement.

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::actor_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Category management
        .nest("/categories", category_routes())
        // Product catalog and stock
        .nest("/products", product_routes())
        // Station management and daily counts
        .nest("/stations", station_routes())
        // Recipe management
        .nest("/recipes", recipe_routes())
        // Production run execution
        .nest("/production", production_routes())
        // Physical count submission
        .nest("/counts", count_routes())
        // Operations dashboard
        .nest("/dashboard", dashboard_routes())
}

/// Category routes
fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_categories))
        .route("/:category_id", get(handlers::get_category))
        .merge(
            Router::new()
                .route("/", post(handlers::create_category))
                .route("/:category_id", put(handlers::update_category))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Product routes
fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_products))
        .route("/:product_id", get(handlers::get_product))
        .route("/:product_id/stock", get(handlers::get_stock))
        .route("/:product_id/movements", get(handlers::get_movements))
        .route("/:product_id/counts", get(handlers::get_product_counts))
        .merge(
            Router::new()
                .route("/", post(handlers::create_product))
                .route(
                    "/:product_id",
                    put(handlers::update_product).delete(handlers::deactivate_product),
                )
                .route("/:product_id/adjust", post(handlers::adjust_stock))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Station routes
fn station_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_stations))
        .route("/:station_id", get(handlers::get_station))
        .route(
            "/:station_id/counts/today",
            get(handlers::get_station_counts_today),
        )
        .merge(
            Router::new()
                .route("/", post(handlers::create_station))
                .route("/:station_id", put(handlers::update_station))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Recipe routes
fn recipe_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_recipes))
        .route("/:recipe_id", get(handlers::get_recipe))
        .merge(
            Router::new()
                .route("/", post(handlers::create_recipe))
                .route("/:recipe_id", put(handlers::update_recipe))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Production run routes
fn production_routes() -> Router<AppState> {
    Router::new()
        .route("/runs", get(handlers::list_runs))
        .route("/runs/:run_id", get(handlers::get_run))
        .merge(
            Router::new()
                .route("/runs", post(handlers::execute_run))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Count routes
fn count_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_counts))
        .merge(
            Router::new()
                .route("/", post(handlers::submit_count))
                .route_layer(middleware::from_fn(actor_middleware)),
        )
}

/// Dashboard routes
fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::get_dashboard))
        .route("/low-stock", get(handlers::get_low_stock))
}
