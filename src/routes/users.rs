//! # 사용자 / 구독 라우트 핸들러
//!
//! ## 엔드포인트
//! - `GET    /api/users`                 → 사용자 목록 (페이지네이션)
//! - `GET    /api/users/{id}`            → 사용자 프로필
//! - `GET    /api/users/me`              → 내 프로필 (로그인 필요)
//! - `POST   /api/users/set_password`    → 비밀번호 변경 (로그인 필요)
//! - `GET    /api/users/subscriptions`   → 내가 구독한 작성자들 + 레시피 미리보기
//! - `POST   /api/users/{id}/subscribe`  → 구독 → `201 Created`
//! - `DELETE /api/users/{id}/subscribe`  → 구독 취소 → `204 No Content`

use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::auth::{AuthUser, MaybeAuthUser},
    models::*,
    routes::{
        auth::{hash_password, verify_password},
        recipes::short_response,
        AppState,
    },
};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

/// 새 비밀번호의 최소 길이 (회원가입과 같음)
const MIN_PASSWORD_LEN: usize = 8;

pub async fn list_users(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Query(params): Query<PageParams>,
) -> Result<Json<Page<UserResponse>>, AppError> {
    let window = params.window(state.page_size);
    let (users, count) = db_users::list_users(&state.pool, window).await?;

    let mut results = Vec::with_capacity(users.len());
    for user in users {
        let is_subscribed = match viewer.user_id() {
            Some(viewer_id) => db::is_following(&state.pool, viewer_id, &user.id).await?,
            None => false,
        };
        results.push(UserResponse::new(user, is_subscribed));
    }

    Ok(Json(Page::new(results, count, window)))
}

pub async fn get_user(
    State(state): State<AppState>,
    viewer: MaybeAuthUser,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;

    let is_subscribed = match viewer.user_id() {
        Some(viewer_id) => db::is_following(&state.pool, viewer_id, &user.id).await?,
        None => false,
    };

    Ok(Json(UserResponse::new(user, is_subscribed)))
}

/// `GET /users/me`: 자기 자신은 구독할 수 없으므로 `is_subscribed`는 항상 false입니다.
pub async fn me(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(UserResponse::new(user, false)))
}

/// `POST /users/set_password`: 현재 비밀번호를 확인한 뒤 교체합니다.
///
/// 변경 후에는 기존 리프레시 토큰을 모두 폐기하여 다른 기기의 세션을 끊습니다.
pub async fn set_password(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Json(req): Json<SetPasswordRequest>,
) -> Result<StatusCode, AppError> {
    let user = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::NotFound)?;

    if !verify_password(&req.current_password, &user.password_hash)? {
        return Err(AppError::BadRequest(
            "Current password is incorrect".to_string(),
        ));
    }
    if req.new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    let password_hash = hash_password(&req.new_password)?;
    db_users::update_password(&state.pool, &user.id, &password_hash).await?;
    db_users::delete_user_refresh_tokens(&state.pool, &user.id).await?;
    tracing::info!("User {} changed password", user.id);

    Ok(StatusCode::NO_CONTENT)
}

/// `GET /users/subscriptions`: 최근에 구독한 작성자부터 보여줍니다.
pub async fn subscriptions(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<Json<Page<SubscriptionResponse>>, AppError> {
    let window = query.page_params().window(state.page_size);
    let (authors, count) = db::list_subscriptions(&state.pool, &auth_user.user_id, window).await?;

    let mut results = Vec::with_capacity(authors.len());
    for author in authors {
        results.push(subscription_response(&state, author, query.recipes_limit).await?);
    }

    Ok(Json(Page::new(results, count, window)))
}

/// `POST /users/{id}/subscribe`
///
/// - 자기 자신: `400 Bad Request` (기존 상태와 무관)
/// - 없는 사용자: `404 Not Found`
/// - 이미 구독 중: `409 Conflict`
pub async fn subscribe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(author_id): Path<String>,
    Query(query): Query<SubscriptionsQuery>,
) -> Result<(StatusCode, Json<SubscriptionResponse>), AppError> {
    if author_id == auth_user.user_id {
        return Err(AppError::BadRequest(
            "You cannot subscribe to yourself".to_string(),
        ));
    }

    let author = db_users::find_by_id(&state.pool, &author_id)
        .await?
        .ok_or(AppError::NotFound)?;

    db::create_follow(&state.pool, &auth_user.user_id, &author.id).await?;
    tracing::info!("User {} subscribed to {}", auth_user.user_id, author.id);

    let response = subscription_response(&state, author, query.recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// `DELETE /users/{id}/subscribe`: 구독 중이 아니었다면 `409 Conflict`.
pub async fn unsubscribe(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(author_id): Path<String>,
) -> Result<StatusCode, AppError> {
    let author = db_users::find_by_id(&state.pool, &author_id)
        .await?
        .ok_or(AppError::NotFound)?;

    let deleted = db::delete_follow(&state.pool, &auth_user.user_id, &author.id).await?;
    if !deleted {
        return Err(AppError::Conflict(
            "You are not subscribed to this user".to_string(),
        ));
    }
    tracing::info!("User {} unsubscribed from {}", auth_user.user_id, author.id);

    Ok(StatusCode::NO_CONTENT)
}

/// 구독 응답: 작성자 프로필 + 최근 레시피 `recipes_limit`개 + 전체 레시피 수.
///
/// 구독 목록에서만 쓰이므로 `is_subscribed`는 항상 true입니다.
async fn subscription_response(
    state: &AppState,
    author: User,
    recipes_limit: Option<i64>,
) -> Result<SubscriptionResponse, AppError> {
    let recipes = db::list_author_recipes(&state.pool, &author.id, recipes_limit)
        .await?
        .into_iter()
        .map(|recipe| short_response(state, recipe))
        .collect();
    let recipes_count = db::count_author_recipes(&state.pool, &author.id).await?;

    Ok(SubscriptionResponse {
        user: UserResponse::new(author, true),
        recipes,
        recipes_count,
    })
}
