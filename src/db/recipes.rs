//! # 레시피 데이터베이스 쿼리 모듈
//!
//! `recipes` 테이블과 두 링크 테이블을 다룹니다.
//!
//! ## 테이블 구조
//! - `recipes`: 레시피 본문 (작성자, 이름, 이미지 경로, 설명, 조리 시간, 게시일)
//! - `recipe_ingredients`: (레시피, 재료) → 수량. 쌍마다 UNIQUE
//! - `recipe_tags`: (레시피, 태그). 쌍마다 UNIQUE
//!
//! 레시피를 삭제하면 `ON DELETE CASCADE`로 링크, 즐겨찾기, 장바구니 행이 함께 삭제됩니다.
//!
//! 생성/수정 함수는 `&mut SqliteConnection`을 받습니다.
//! 라우트에서 `pool.begin()`으로 연 트랜잭션을 `&mut *tx`로 넘겨,
//! 본문과 링크 변경이 한 트랜잭션으로 묶이게 합니다.

use crate::error::AppError;
use crate::models::page::PageWindow;
use crate::models::*;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

/// 레시피 본문 행을 추가합니다. (작성자 = 요청한 사용자)
pub async fn insert_recipe(
    conn: &mut SqliteConnection,
    id: &str,
    author_id: &str,
    req: &CreateRecipeRequest,
    image_path: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO recipes (id, author_id, name, image, text, cooking_time)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(author_id)
    .bind(req.name.trim())
    .bind(image_path)
    .bind(&req.text)
    .bind(req.cooking_time)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

/// 요청에 포함된 스칼라 필드만 업데이트합니다. (PATCH)
///
/// `image_path`는 새 이미지가 저장된 경우에만 Some입니다.
pub async fn update_recipe_fields(
    conn: &mut SqliteConnection,
    id: &str,
    req: &UpdateRecipeRequest,
    image_path: Option<&str>,
) -> Result<(), AppError> {
    if let Some(name) = &req.name {
        sqlx::query("UPDATE recipes SET name = ? WHERE id = ?")
            .bind(name.trim())
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    if let Some(text) = &req.text {
        sqlx::query("UPDATE recipes SET text = ? WHERE id = ?")
            .bind(text)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    if let Some(cooking_time) = req.cooking_time {
        sqlx::query("UPDATE recipes SET cooking_time = ? WHERE id = ?")
            .bind(cooking_time)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    if let Some(image_path) = image_path {
        sqlx::query("UPDATE recipes SET image = ? WHERE id = ?")
            .bind(image_path)
            .bind(id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

/// 레시피의 재료 링크를 전부 지우고 `items`로 다시 채웁니다.
///
/// 재료는 id로 조회만 하고 새로 만들지 않습니다. 없는 id면 `NotFound`.
/// 새 레시피에 대해 호출하면 지울 것이 없으므로 단순 추가와 같습니다.
pub async fn replace_ingredients(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    items: &[IngredientAmount],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM recipe_ingredients WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for item in items {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT 1 FROM ingredients WHERE id = ?")
            .bind(&item.id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound);
        }

        sqlx::query(
            r#"
            INSERT INTO recipe_ingredients (id, recipe_id, ingredient_id, amount)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(uuid::Uuid::now_v7().to_string())
        .bind(recipe_id)
        .bind(&item.id)
        .bind(item.amount)
        .execute(&mut *conn)
        .await?;
    }

    Ok(())
}

/// 레시피의 태그 링크를 전부 지우고 `tag_ids`로 다시 채웁니다. 없는 태그면 `NotFound`.
pub async fn replace_tags(
    conn: &mut SqliteConnection,
    recipe_id: &str,
    tag_ids: &[String],
) -> Result<(), AppError> {
    sqlx::query("DELETE FROM recipe_tags WHERE recipe_id = ?")
        .bind(recipe_id)
        .execute(&mut *conn)
        .await?;

    for tag_id in tag_ids {
        let exists = sqlx::query_as::<_, (i64,)>("SELECT 1 FROM tags WHERE id = ?")
            .bind(tag_id)
            .fetch_optional(&mut *conn)
            .await?;
        if exists.is_none() {
            return Err(AppError::NotFound);
        }

        sqlx::query("INSERT INTO recipe_tags (recipe_id, tag_id) VALUES (?, ?)")
            .bind(recipe_id)
            .bind(tag_id)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub async fn get_recipe(pool: &SqlitePool, id: &str) -> Result<Option<RecipeRow>, AppError> {
    let recipe = sqlx::query_as::<_, RecipeRow>(
        r#"
        SELECT id, author_id, name, image, text, cooking_time, pub_date
        FROM recipes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(recipe)
}

pub async fn get_recipe_short(pool: &SqlitePool, id: &str) -> Result<Option<RecipeShort>, AppError> {
    let recipe = sqlx::query_as::<_, RecipeShort>(
        "SELECT id, name, image, cooking_time FROM recipes WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(recipe)
}

/// 레시피의 재료 목록 (저장된 순서)
pub async fn get_recipe_ingredients(
    pool: &SqlitePool,
    recipe_id: &str,
) -> Result<Vec<RecipeIngredient>, AppError> {
    let ingredients = sqlx::query_as::<_, RecipeIngredient>(
        r#"
        SELECT i.id, i.name, i.measurement_unit, ri.amount
        FROM recipe_ingredients ri
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE ri.recipe_id = ?
        ORDER BY ri.rowid
        "#,
    )
    .bind(recipe_id)
    .fetch_all(pool)
    .await?;

    Ok(ingredients)
}

/// ## 반환값
/// - `true`: 삭제 성공
/// - `false`: 해당 ID의 레시피가 없음
pub async fn delete_recipe(pool: &SqlitePool, id: &str) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM recipes WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// 필터에 맞는 레시피를 최신순으로 한 페이지 조회합니다.
///
/// 반환값: (현재 페이지의 레시피들, 필터에 맞는 전체 개수)
///
/// `is_favorited` / `is_in_shopping_cart`는 로그인한 사용자 기준이므로,
/// 익명 요청(`viewer = None`)에서 둘 중 하나라도 켜져 있으면 빈 결과입니다.
pub async fn list_recipes(
    pool: &SqlitePool,
    filter: &RecipeFilter,
    viewer: Option<&str>,
    window: PageWindow,
) -> Result<(Vec<RecipeRow>, i64), AppError> {
    if (filter.is_favorited || filter.is_in_shopping_cart) && viewer.is_none() {
        return Ok((Vec::new(), 0));
    }
    let viewer = viewer.unwrap_or_default();

    // QueryBuilder: 조건에 따라 WHERE 절을 동적으로 조립합니다.
    // push_bind()는 값을 `?` 자리표시자로 바인딩하므로 SQL 인젝션에 안전합니다.
    let mut count_query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM recipes r");
    push_filter(&mut count_query, filter, viewer);
    let (count,) = count_query
        .build_query_as::<(i64,)>()
        .fetch_one(pool)
        .await?;

    let mut query = QueryBuilder::<Sqlite>::new(
        "SELECT r.id, r.author_id, r.name, r.image, r.text, r.cooking_time, r.pub_date FROM recipes r",
    );
    push_filter(&mut query, filter, viewer);
    query
        .push(" ORDER BY r.pub_date DESC, r.rowid DESC LIMIT ")
        .push_bind(window.size)
        .push(" OFFSET ")
        .push_bind(window.offset());
    let recipes = query.build_query_as::<RecipeRow>().fetch_all(pool).await?;

    Ok((recipes, count))
}

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &RecipeFilter, viewer: &str) {
    query.push(" WHERE 1 = 1");

    if let Some(author) = &filter.author {
        query.push(" AND r.author_id = ").push_bind(author.clone());
    }

    if let Some(name) = &filter.name {
        query.push(" AND r.name = ").push_bind(name.clone());
    }

    // 태그는 OR 조건: 주어진 slug 중 하나라도 붙어 있으면 포함
    if !filter.tags.is_empty() {
        query.push(
            " AND EXISTS (SELECT 1 FROM recipe_tags rt JOIN tags t ON t.id = rt.tag_id \
             WHERE rt.recipe_id = r.id AND t.slug IN (",
        );
        let mut slugs = query.separated(", ");
        for slug in &filter.tags {
            slugs.push_bind(slug.clone());
        }
        slugs.push_unseparated("))");
    }

    if filter.is_favorited {
        query
            .push(" AND EXISTS (SELECT 1 FROM favorites f WHERE f.recipe_id = r.id AND f.user_id = ")
            .push_bind(viewer.to_string())
            .push(")");
    }

    if filter.is_in_shopping_cart {
        query
            .push(
                " AND EXISTS (SELECT 1 FROM shopping_cart sc WHERE sc.recipe_id = r.id AND sc.user_id = ",
            )
            .push_bind(viewer.to_string())
            .push(")");
    }
}

/// 작성자의 레시피 미리보기 (최신순). `limit`이 None이면 전부.
pub async fn list_author_recipes(
    pool: &SqlitePool,
    author_id: &str,
    limit: Option<i64>,
) -> Result<Vec<RecipeShort>, AppError> {
    // SQLite에서 LIMIT -1은 "제한 없음"입니다.
    let limit = limit.filter(|l| *l >= 0).unwrap_or(-1);

    let recipes = sqlx::query_as::<_, RecipeShort>(
        r#"
        SELECT id, name, image, cooking_time
        FROM recipes
        WHERE author_id = ?
        ORDER BY pub_date DESC, rowid DESC
        LIMIT ?
        "#,
    )
    .bind(author_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(recipes)
}

pub async fn count_author_recipes(pool: &SqlitePool, author_id: &str) -> Result<i64, AppError> {
    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM recipes WHERE author_id = ?")
        .bind(author_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}
