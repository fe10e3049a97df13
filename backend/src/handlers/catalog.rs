//! HTTP handlers for category, product and station management

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::catalog::{
    CatalogService, CreateCategoryInput, CreateProductInput, CreateStationInput,
    UpdateCategoryInput, UpdateProductInput, UpdateStationInput,
};
use crate::AppState;
use shared::{Category, Product, Station};

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.db);
    let category = service.create_category(input).await?;
    Ok(Json(category))
}

/// List all categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CatalogService::new(state.db);
    let categories = service.list_categories().await?;
    Ok(Json(categories))
}

/// Get a category
pub async fn get_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.db);
    let category = service.get_category(category_id).await?;
    Ok(Json(category))
}

/// Update a category
pub async fn update_category(
    State(state): State<AppState>,
    Path(category_id): Path<Uuid>,
    Json(input): Json<UpdateCategoryInput>,
) -> AppResult<Json<Category>> {
    let service = CatalogService::new(state.db);
    let category = service.update_category(category_id, input).await?;
    Ok(Json(category))
}

#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub include_inactive: bool,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<CreateProductInput>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    let product = service.create_product(input).await?;
    Ok(Json(product))
}

/// List products, active only by default
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let service = CatalogService::new(state.db);
    let products = service.list_products(query.include_inactive).await?;
    Ok(Json(products))
}

/// Get a product
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    let product = service.get_product(product_id).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<UpdateProductInput>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    let product = service.update_product(product_id, input).await?;
    Ok(Json(product))
}

/// Deactivate a product (soft delete; its movement history stays)
pub async fn deactivate_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Product>> {
    let service = CatalogService::new(state.db);
    let product = service.deactivate_product(product_id).await?;
    Ok(Json(product))
}

/// Create a station
pub async fn create_station(
    State(state): State<AppState>,
    Json(input): Json<CreateStationInput>,
) -> AppResult<Json<Station>> {
    let service = CatalogService::new(state.db);
    let station = service.create_station(input).await?;
    Ok(Json(station))
}

/// List all stations
pub async fn list_stations(State(state): State<AppState>) -> AppResult<Json<Vec<Station>>> {
    let service = CatalogService::new(state.db);
    let stations = service.list_stations().await?;
    Ok(Json(stations))
}

/// Get a station
pub async fn get_station(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
) -> AppResult<Json<Station>> {
    let service = CatalogService::new(state.db);
    let station = service.get_station(station_id).await?;
    Ok(Json(station))
}

/// Update a station
pub async fn update_station(
    State(state): State<AppState>,
    Path(station_id): Path<Uuid>,
    Json(input): Json<UpdateStationInput>,
) -> AppResult<Json<Station>> {
    let service = CatalogService::new(state.db);
    let station = service.update_station(station_id, input).await?;
    Ok(Json(station))
}
