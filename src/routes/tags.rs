//! # 태그 API 라우트 핸들러
//!
//! 태그는 픽스처로만 만들어지는 읽기 전용 카탈로그입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | /api/tags | `list_tags` | 전체 태그 목록 (페이지네이션 없음) |
//! | GET | /api/tags/{id} | `get_tag` | 단일 태그 |

use crate::{db, error::AppError, models::*, routes::AppState};
use axum::{
    extract::{Path, State},
    Json,
};

/// `GET /api/tags` → `[{ "id", "name", "color", "slug" }, ...]`
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = db::list_tags(&state.pool).await?;
    Ok(Json(tags))
}

/// `GET /api/tags/{id}`
///
/// `ok_or()`: Option<Tag>을 Result로 바꿉니다. None이면 HTTP 404 응답이 됩니다.
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Tag>, AppError> {
    let tag = db::get_tag(&state.pool, &id)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(tag))
}
