//! # 레시피(Recipe) 라우트 핸들러
//!
//! 레시피의 CRUD(생성/조회/수정/삭제)를 처리하는 HTTP 핸들러 함수들입니다.
//!
//! ## 엔드포인트
//! - `GET    /api/recipes`       → 레시피 목록 (필터 + 페이지네이션)
//! - `POST   /api/recipes`       → 새 레시피 생성 (로그인 필요)
//! - `GET    /api/recipes/{id}`  → 단일 레시피 조회
//! - `PATCH  /api/recipes/{id}`  → 레시피 수정 (작성자만)
//! - `DELETE /api/recipes/{id}`  → 레시피 삭제 (작성자만)
//!
//! ## Axum 핸들러 패턴
//! - `State(state)`: 앱 전역 상태 (DB 풀, 설정 등)
//! - `AuthUser` / `MaybeAuthUser`: Authorization 헤더에서 현재 사용자 추출
//! - `Path(id)`: URL 경로 파라미터
//! - `Json(body)`: 요청 본문을 구조체로 파싱 (항상 마지막 인자)

use crate::{
    db,
    error::AppError,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::*,
    services::images,
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

/// 애플리케이션 공유 상태
///
/// 모든 요청 핸들러가 `State(state): State<AppState>`로 접근합니다.
/// SqlitePool은 내부적으로 Arc를 사용하므로 clone해도 같은 풀을 가리킵니다.
#[derive(Clone)]
pub struct AppState {
    /// SQLite 연결 풀
    pub pool: SqlitePool,
    /// JWT 토큰 서명용 비밀키
    pub jwt_secret: String,
    /// 레시피 이미지 저장 디렉토리
    pub media_path: String,
    /// 이미지 URL 접두사
    pub media_url: String,
    /// 목록 API의 기본 페이지 크기
    pub page_size: i64,
}

/// `GET /recipes`: 레시피 목록을 최신순으로 조회합니다.
///
/// `tags`는 여러 번 올 수 있으므로(`?tags=lunch&tags=dinner`)
/// 쿼리 문자열을 (키, 값) 쌍 목록으로 받아 `RecipeFilter`로 해석합니다.
pub async fn list_recipes(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Page<RecipeResponse>>, AppError> {
    let filter = RecipeFilter::from_query(&pairs)?;
    let window = filter.page_params().window(state.page_size);

    let (rows, count) = db::list_recipes(&state.pool, &filter, viewer.user_id(), window).await?;

    let mut results = Vec::with_capacity(rows.len());
    for row in rows {
        results.push(recipe_response(&state, row, viewer.user_id()).await?);
    }

    Ok(Json(Page::new(results, count, window)))
}

/// `GET /recipes/{id}`: 단일 레시피를 조회합니다.
pub async fn get_recipe(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<Json<RecipeResponse>, AppError> {
    let recipe = db::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(recipe_response(&state, recipe, viewer.user_id()).await?))
}

/// `POST /recipes`: 새 레시피를 생성합니다. → `201 Created`
///
/// ## 처리 흐름
/// 1. 요청 DTO 검증 (DB에 닿기 전)
/// 2. 이미지를 디스크에 저장
/// 3. 트랜잭션 안에서 레시피 본문 + 재료 링크 + 태그 링크 삽입
/// 4. 트랜잭션이 실패하면 저장했던 이미지를 지웁니다
pub async fn create_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<CreateRecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), AppError> {
    req.validate()?;

    let image_path = images::save_image(&state.media_path, &req.image).await?;
    let id = uuid::Uuid::now_v7().to_string();

    if let Err(e) = write_new_recipe(&state.pool, &id, &auth_user.user_id, &req, &image_path).await {
        images::remove_image(&state.media_path, &image_path).await;
        return Err(e);
    }
    tracing::info!("User {} created recipe {}", auth_user.user_id, id);

    let recipe = db::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created recipe".to_string()))?;
    let response = recipe_response(&state, recipe, Some(&auth_user.user_id)).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

async fn write_new_recipe(
    pool: &SqlitePool,
    id: &str,
    author_id: &str,
    req: &CreateRecipeRequest,
    image_path: &str,
) -> Result<(), AppError> {
    // pool.begin(): 트랜잭션 시작. commit() 전에 에러로 빠져나가면 drop 시 자동 롤백됩니다.
    let mut tx = pool.begin().await?;
    db::insert_recipe(&mut *tx, id, author_id, req, image_path).await?;
    db::replace_ingredients(&mut *tx, id, &req.ingredients).await?;
    db::replace_tags(&mut *tx, id, &req.tags).await?;
    tx.commit().await?;
    Ok(())
}

/// `PATCH /recipes/{id}`: 레시피를 수정합니다. 작성자만 가능합니다.
///
/// 본문에 있는 스칼라 필드만 바꿉니다.
/// `ingredients`/`tags`는 비어 있지 않은 목록일 때만 전체 교체되고,
/// 빠지거나 빈 목록이면 기존 링크가 그대로 남습니다.
pub async fn update_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateRecipeRequest>,
) -> Result<Json<RecipeResponse>, AppError> {
    req.validate()?;

    let recipe = db::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if recipe.author_id != auth_user.user_id {
        return Err(AppError::Forbidden(
            "Only the author can change this recipe".to_string(),
        ));
    }

    let new_image = match &req.image {
        Some(data_url) => Some(images::save_image(&state.media_path, data_url).await?),
        None => None,
    };

    match write_recipe_update(&state.pool, &id, &req, new_image.as_deref()).await {
        Ok(()) => {
            // 새 이미지로 바뀌었으면 이전 파일은 더 이상 참조되지 않습니다.
            if new_image.is_some() {
                images::remove_image(&state.media_path, &recipe.image).await;
            }
        }
        Err(e) => {
            if let Some(path) = &new_image {
                images::remove_image(&state.media_path, path).await;
            }
            return Err(e);
        }
    }
    tracing::info!("User {} updated recipe {}", auth_user.user_id, id);

    let recipe = db::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(
        recipe_response(&state, recipe, Some(&auth_user.user_id)).await?,
    ))
}

async fn write_recipe_update(
    pool: &SqlitePool,
    id: &str,
    req: &UpdateRecipeRequest,
    image_path: Option<&str>,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;
    db::update_recipe_fields(&mut *tx, id, req, image_path).await?;
    if let Some(ingredients) = req.replacement_ingredients() {
        db::replace_ingredients(&mut *tx, id, ingredients).await?;
    }
    if let Some(tags) = req.replacement_tags() {
        db::replace_tags(&mut *tx, id, tags).await?;
    }
    tx.commit().await?;
    Ok(())
}

/// `DELETE /recipes/{id}`: 레시피를 삭제합니다. 작성자만 가능합니다. → `204 No Content`
///
/// 재료/태그 링크, 즐겨찾기, 장바구니 행은 `ON DELETE CASCADE`로 함께 삭제됩니다.
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let recipe = db::get_recipe(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    if recipe.author_id != auth_user.user_id {
        return Err(AppError::Forbidden(
            "Only the author can delete this recipe".to_string(),
        ));
    }

    let deleted = db::delete_recipe(&state.pool, &id).await?;
    if !deleted {
        return Err(AppError::NotFound);
    }
    images::remove_image(&state.media_path, &recipe.image).await;
    tracing::info!("User {} deleted recipe {}", auth_user.user_id, id);

    Ok(StatusCode::NO_CONTENT)
}

/// 레시피 행을 상세 응답으로 조립합니다.
///
/// `viewer`가 None(익명)이면 구독/즐겨찾기/장바구니 여부는 모두 false입니다.
pub(crate) async fn recipe_response(
    state: &AppState,
    recipe: RecipeRow,
    viewer: Option<&str>,
) -> Result<RecipeResponse, AppError> {
    let author = db::users::find_by_id(&state.pool, &recipe.author_id)
        .await?
        .ok_or(AppError::Internal("Recipe author is missing".to_string()))?;
    let tags = db::get_recipe_tags(&state.pool, &recipe.id).await?;
    let ingredients = db::get_recipe_ingredients(&state.pool, &recipe.id).await?;

    let (is_subscribed, is_favorited, is_in_shopping_cart) = match viewer {
        Some(user_id) => (
            db::is_following(&state.pool, user_id, &author.id).await?,
            db::in_collection(&state.pool, db::RecipeCollection::Favorites, user_id, &recipe.id)
                .await?,
            db::in_collection(
                &state.pool,
                db::RecipeCollection::ShoppingCart,
                user_id,
                &recipe.id,
            )
            .await?,
        ),
        None => (false, false, false),
    };

    Ok(RecipeResponse {
        id: recipe.id,
        tags,
        author: UserResponse::new(author, is_subscribed),
        ingredients,
        is_favorited,
        is_in_shopping_cart,
        name: recipe.name,
        image: images::image_url(&state.media_url, &recipe.image),
        text: recipe.text,
        cooking_time: recipe.cooking_time,
        pub_date: recipe.pub_date,
    })
}

/// 짧은 레시피 표현의 이미지 경로를 URL로 바꿉니다.
pub(crate) fn short_response(state: &AppState, recipe: RecipeShort) -> RecipeShort {
    RecipeShort {
        image: images::image_url(&state.media_url, &recipe.image),
        ..recipe
    }
}
