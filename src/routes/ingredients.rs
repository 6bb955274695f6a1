use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, Query, State},
    Json,
};

/// `GET /api/ingredients?name=<text>`: unpaginated, ordered by name.
pub async fn list_ingredients(
    State(state): State<AppState>,
    Query(search): Query<IngredientSearch>,
) -> Result<Json<Vec<Ingredient>>, AppError> {
    let ingredients = db::list_ingredients(&state.pool, search.name.as_deref()).await?;
    Ok(Json(ingredients))
}

pub async fn get_ingredient(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Ingredient>, AppError> {
    let ingredient = db::get_ingredient(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(ingredient))
}
