//! # 즐겨찾기 / 장바구니 라우트 핸들러
//!
//! ## 엔드포인트
//! - `POST   /api/recipes/{id}/favorite`          → 즐겨찾기 추가 → `201 Created`
//! - `DELETE /api/recipes/{id}/favorite`          → 즐겨찾기 해제 → `204 No Content`
//! - `POST   /api/recipes/{id}/shopping_cart`     → 장바구니 추가 → `201 Created`
//! - `DELETE /api/recipes/{id}/shopping_cart`     → 장바구니에서 제거 → `204 No Content`
//! - `GET    /api/recipes/download_shopping_cart` → 쇼핑 리스트 텍스트 파일
//!
//! 이미 담긴 레시피를 다시 담거나, 담기지 않은 레시피를 빼면 `409 Conflict`입니다.

use crate::{
    db::{self, RecipeCollection},
    error::AppError,
    middleware::auth::AuthUser,
    models::RecipeShort,
    routes::{recipes::short_response, AppState},
    services::shopping_list,
};
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};

async fn add(
    state: &AppState,
    collection: RecipeCollection,
    user_id: &str,
    recipe_id: &str,
) -> Result<(StatusCode, Json<RecipeShort>), AppError> {
    let recipe = db::get_recipe_short(&state.pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::add_to_collection(&state.pool, collection, user_id, recipe_id).await?;
    tracing::debug!("User {} added recipe {} to {:?}", user_id, recipe_id, collection);

    Ok((StatusCode::CREATED, Json(short_response(state, recipe))))
}

async fn remove(
    state: &AppState,
    collection: RecipeCollection,
    user_id: &str,
    recipe_id: &str,
) -> Result<StatusCode, AppError> {
    db::get_recipe_short(&state.pool, recipe_id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::remove_from_collection(&state.pool, collection, user_id, recipe_id).await?;
    tracing::debug!("User {} removed recipe {} from {:?}", user_id, recipe_id, collection);

    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShort>), AppError> {
    add(&state, RecipeCollection::Favorites, &auth_user.user_id, &id).await
}

pub async fn remove_favorite(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    remove(&state, RecipeCollection::Favorites, &auth_user.user_id, &id).await
}

pub async fn add_to_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<(StatusCode, Json<RecipeShort>), AppError> {
    add(&state, RecipeCollection::ShoppingCart, &auth_user.user_id, &id).await
}

pub async fn remove_from_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    remove(&state, RecipeCollection::ShoppingCart, &auth_user.user_id, &id).await
}

/// `GET /recipes/download_shopping_cart`: 장바구니 재료를 합산한 텍스트 첨부 파일.
///
/// 장바구니가 비어 있으면 본문이 빈 파일입니다.
/// 집계 중 실패하면 원인은 로그로 남기고 클라이언트에는 `export_failed`만 알립니다.
pub async fn download_shopping_cart(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Response, AppError> {
    let body = shopping_list::export(&state.pool, &auth_user.user_id)
        .await
        .map_err(|e| {
            tracing::error!(
                "Shopping list export failed for user {}: {}",
                auth_user.user_id,
                e
            );
            AppError::ExportFailed
        })?;

    let headers = [
        (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", shopping_list::FILENAME),
        ),
    ];

    Ok((headers, body).into_response())
}
