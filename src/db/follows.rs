//! # 구독(팔로우) 데이터베이스 쿼리 모듈
//!
//! `follows` 테이블은 (user_id → author_id) 방향의 간선입니다.
//! (user_id, author_id) UNIQUE 제약이 중복 구독을 막고,
//! 자기 자신 구독 금지는 라우트 계층에서 검사합니다.

use crate::db::conflict_on_unique;
use crate::error::AppError;
use crate::models::page::PageWindow;
use crate::models::User;
use sqlx::SqlitePool;

/// 구독 간선을 만듭니다. 이미 있으면 `Conflict`.
pub async fn create_follow(
    pool: &SqlitePool,
    user_id: &str,
    author_id: &str,
) -> Result<(), AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query("INSERT INTO follows (id, user_id, author_id) VALUES (?, ?, ?)")
        .bind(&id)
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, "You are already subscribed to this user"))?;

    Ok(())
}

/// 구독 간선을 삭제합니다.
///
/// ## 반환값
/// - `true`: 삭제됨
/// - `false`: 구독 관계가 없었음
pub async fn delete_follow(
    pool: &SqlitePool,
    user_id: &str,
    author_id: &str,
) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM follows WHERE user_id = ? AND author_id = ?")
        .bind(user_id)
        .bind(author_id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn is_following(
    pool: &SqlitePool,
    user_id: &str,
    author_id: &str,
) -> Result<bool, AppError> {
    let row = sqlx::query_as::<_, (i64,)>(
        "SELECT 1 FROM follows WHERE user_id = ? AND author_id = ?",
    )
    .bind(user_id)
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.is_some())
}

/// `user_id`가 구독한 작성자 목록을 최근 구독 순으로 조회합니다.
///
/// 반환값: (현재 페이지의 작성자들, 전체 구독 수)
pub async fn list_subscriptions(
    pool: &SqlitePool,
    user_id: &str,
    window: PageWindow,
) -> Result<(Vec<User>, i64), AppError> {
    let authors = sqlx::query_as::<_, User>(
        r#"
        SELECT u.id, u.email, u.username, u.first_name, u.last_name,
               u.password_hash, u.created_at
        FROM users u
        JOIN follows f ON f.author_id = u.id
        WHERE f.user_id = ?
        ORDER BY f.rowid DESC
        LIMIT ? OFFSET ?
        "#,
    )
    .bind(user_id)
    .bind(window.size)
    .bind(window.offset())
    .fetch_all(pool)
    .await?;

    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM follows WHERE user_id = ?")
        .bind(user_id)
        .fetch_one(pool)
        .await?;

    Ok((authors, count))
}
