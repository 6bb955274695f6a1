//! # Foodgram 백엔드 라이브러리
//!
//! 레시피 공유 서비스의 HTTP API입니다.
//! 바이너리(`main.rs`)와 통합 테스트(`tests/`)가 같은 라우터를 쓰도록
//! 모듈과 `build_app()`을 라이브러리로 공개합니다.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{
    routing::{get, post},
    Router,
};
use routes::*;
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};

/// 모든 API 라우트를 `/api` 아래에 묶은 라우터를 만듭니다.
///
/// 고정 경로(`/users/me`, `/users/subscriptions`, `/recipes/download_shopping_cart`)는
/// `{id}` 경로보다 우선 매칭됩니다. (axum은 고정 세그먼트를 먼저 봅니다)
pub fn build_app(state: AppState) -> Router {
    // 인증 관련 라우트 (토큰 발급, 갱신, 로그아웃)
    let auth_routes = Router::new()
        .route("/auth/token/login", post(routes::auth::login))
        .route("/auth/token/refresh", post(routes::auth::refresh))
        .route("/auth/token/logout", post(routes::auth::logout));

    // 사용자와 구독
    let user_routes = Router::new()
        .route(
            "/users",
            get(routes::users::list_users).post(routes::auth::register),
        )
        .route("/users/me", get(routes::users::me))
        .route("/users/set_password", post(routes::users::set_password))
        .route("/users/subscriptions", get(routes::users::subscriptions))
        .route("/users/{id}", get(routes::users::get_user))
        .route(
            "/users/{id}/subscribe",
            post(routes::users::subscribe).delete(routes::users::unsubscribe),
        );

    // 레시피, 즐겨찾기, 장바구니
    let recipe_routes = Router::new()
        .route("/recipes", get(list_recipes).post(create_recipe))
        .route(
            "/recipes/download_shopping_cart",
            get(download_shopping_cart),
        )
        .route(
            "/recipes/{id}",
            get(get_recipe).patch(update_recipe).delete(delete_recipe),
        )
        .route(
            "/recipes/{id}/favorite",
            post(add_favorite).delete(remove_favorite),
        )
        .route(
            "/recipes/{id}/shopping_cart",
            post(add_to_shopping_cart).delete(remove_from_shopping_cart),
        );

    // 읽기 전용 카탈로그
    let catalog_routes = Router::new()
        .route("/tags", get(list_tags))
        .route("/tags/{id}", get(get_tag))
        .route("/ingredients", get(list_ingredients))
        .route("/ingredients/{id}", get(get_ingredient));

    let media_path = state.media_path.clone();
    let media_url = state.media_url.clone();

    let api_routes = Router::new()
        .merge(auth_routes)
        .merge(user_routes)
        .merge(recipe_routes)
        .merge(catalog_routes)
        .route("/health", get(health_check))
        .with_state(state);

    // 개발 환경 기준으로 모든 출처를 허용합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new().nest("/api", api_routes);

    // 저장된 레시피 이미지는 MEDIA_URL 아래에서 정적 파일로 서빙합니다.
    // 외부 URL(CDN 등)이면 다른 서버가 서빙하므로 여기서는 붙이지 않습니다.
    let app = if media_url.starts_with('/') && media_url.len() > 1 {
        app.nest_service(&media_url, ServeDir::new(media_path))
    } else {
        tracing::debug!("MEDIA_URL {} is not a local path, media not served", media_url);
        app
    };

    app.layer(cors).layer(TraceLayer::new_for_http())
}
