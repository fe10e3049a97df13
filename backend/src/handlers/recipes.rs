//! HTTP handlers for recipe management

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::recipe::{RecipeDefinitionInput, RecipeService};
use crate::AppState;
use shared::Recipe;

/// Create a recipe
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(input): Json<RecipeDefinitionInput>,
) -> AppResult<Json<Recipe>> {
    let service = RecipeService::new(state.db);
    let recipe = service.create(input).await?;
    Ok(Json(recipe))
}

/// List all recipes
pub async fn list_recipes(State(state): State<AppState>) -> AppResult<Json<Vec<Recipe>>> {
    let service = RecipeService::new(state.db);
    let recipes = service.list().await?;
    Ok(Json(recipes))
}

/// Get a recipe with its ingredient lines
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
) -> AppResult<Json<Recipe>> {
    let service = RecipeService::new(state.db);
    let recipe = service.get(recipe_id).await?;
    Ok(Json(recipe))
}

/// Replace a recipe definition
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(recipe_id): Path<Uuid>,
    Json(input): Json<RecipeDefinitionInput>,
) -> AppResult<Json<Recipe>> {
    let service = RecipeService::new(state.db);
    let recipe = service.update(recipe_id, input).await?;
    Ok(Json(recipe))
}
