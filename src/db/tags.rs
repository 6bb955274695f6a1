//! # 태그 데이터베이스 쿼리 모듈
//!
//! 태그 조회/생성 및 레시피-태그 관계 조회 쿼리 함수들입니다.
//!
//! ## 테이블 구조
//! - `tags`: 태그 엔티티 (id, name, color, slug)
//! - `recipe_tags`: 레시피와 태그의 다대다(N:M) 관계 테이블

use crate::db::conflict_on_unique;
use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 모든 태그를 slug 순으로 조회합니다.
pub async fn list_tags(pool: &SqlitePool) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags ORDER BY slug")
        .fetch_all(pool)
        .await?;

    Ok(tags)
}

/// ID로 태그 하나를 조회합니다.
///
/// `fetch_optional`은 결과가 0행이면 None, 1행이면 Some(Tag)을 반환합니다.
pub async fn get_tag(pool: &SqlitePool, id: &str) -> Result<Option<Tag>, AppError> {
    let tag = sqlx::query_as::<_, Tag>("SELECT id, name, color, slug FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(tag)
}

/// 새 태그를 생성합니다.
///
/// slug가 없으면 `slug::slugify(name)`으로 만듭니다.
/// 이름/색상/slug 중 하나라도 겹치면 `Conflict`를 반환합니다.
pub async fn create_tag(pool: &SqlitePool, new_tag: &NewTag) -> Result<Tag, AppError> {
    if !is_hex_color(&new_tag.color) {
        return Err(AppError::BadRequest(format!(
            "Invalid HEX color: {}",
            new_tag.color
        )));
    }

    let id = uuid::Uuid::now_v7().to_string();
    let slug = new_tag
        .slug
        .clone()
        .unwrap_or_else(|| slug::slugify(&new_tag.name));

    sqlx::query("INSERT INTO tags (id, name, color, slug) VALUES (?, ?, ?, ?)")
        .bind(&id)
        .bind(&new_tag.name)
        .bind(&new_tag.color)
        .bind(&slug)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "Tag with this name, color or slug already exists"))?;

    get_tag(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created tag".to_string()))
}

pub async fn count_tags(pool: &SqlitePool) -> Result<i64, AppError> {
    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM tags")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// 특정 레시피에 연결된 모든 태그를 조회합니다.
///
/// ```sql
/// tags ←── recipe_tags ──→ recipes
///  (1)        (N:M)           (1)
/// ```
pub async fn get_recipe_tags(pool: &SqlitePool, recipe_id: &str) -> Result<Vec<Tag>, AppError> {
    let tags = sqlx::query_as::<_, Tag>(
        r#"
        SELECT t.id, t.name, t.color, t.slug
        FROM tags t
        JOIN recipe_tags rt ON rt.tag_id = t.id
        WHERE rt.recipe_id = ?
        ORDER BY t.slug
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(tags)
}
