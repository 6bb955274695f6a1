//! # 즐겨찾기 / 장바구니 데이터베이스 쿼리 모듈
//!
//! 두 기능은 구조가 같습니다: (user_id, recipe_id) UNIQUE 조인 테이블에
//! 행이 있으면 "담김", 없으면 "안 담김"입니다.
//! 그래서 테이블 이름만 다른 `RecipeCollection` 하나로 묶어서 다룹니다.
//!
//! 추가/삭제는 멱등(idempotent)하지 않습니다:
//! 이미 있는 것을 추가하거나 없는 것을 삭제하면 `Conflict`를 반환합니다.

use crate::db::conflict_on_unique;
use crate::error::AppError;
use crate::models::RecipeIngredient;
use sqlx::SqlitePool;

/// 사용자별 레시피 모음의 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeCollection {
    /// 즐겨찾기 (`favorites` 테이블)
    Favorites,
    /// 장바구니 (`shopping_cart` 테이블)
    ShoppingCart,
}

impl RecipeCollection {
    /// 테이블 이름. 고정된 `&'static str`이므로 SQL에 직접 넣어도 안전합니다.
    fn table(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "favorites",
            RecipeCollection::ShoppingCart => "shopping_cart",
        }
    }

    fn already_present(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "Recipe is already in favorites",
            RecipeCollection::ShoppingCart => "Recipe is already in the shopping cart",
        }
    }

    fn not_present(self) -> &'static str {
        match self {
            RecipeCollection::Favorites => "Recipe is not in favorites",
            RecipeCollection::ShoppingCart => "Recipe is not in the shopping cart",
        }
    }
}

/// 레시피를 모음에 추가합니다.
///
/// 미리 존재 여부를 확인하지 않고 바로 INSERT합니다.
/// 동시에 같은 요청이 두 번 와도 UNIQUE 제약에 의해 하나만 성공합니다.
pub async fn add_to_collection(
    pool: &SqlitePool,
    collection: RecipeCollection,
    user_id: &str,
    recipe_id: &str,
) -> Result<(), AppError> {
    let id = uuid::Uuid::now_v7().to_string();
    let sql = format!(
        "INSERT INTO {} (id, user_id, recipe_id) VALUES (?, ?, ?)",
        collection.table()
    );

    sqlx::query(&sql)
        .bind(&id)
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await
        .map_err(|e| conflict_on_unique(e, collection.already_present()))?;

    Ok(())
}

/// 레시피를 모음에서 뺍니다. 원래 없었다면 `Conflict`.
pub async fn remove_from_collection(
    pool: &SqlitePool,
    collection: RecipeCollection,
    user_id: &str,
    recipe_id: &str,
) -> Result<(), AppError> {
    let sql = format!(
        "DELETE FROM {} WHERE user_id = ? AND recipe_id = ?",
        collection.table()
    );

    let result = sqlx::query(&sql)
        .bind(user_id)
        .bind(recipe_id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::Conflict(collection.not_present().to_string()));
    }
    Ok(())
}

pub async fn in_collection(
    pool: &SqlitePool,
    collection: RecipeCollection,
    user_id: &str,
    recipe_id: &str,
) -> Result<bool, AppError> {
    let sql = format!(
        "SELECT 1 FROM {} WHERE user_id = ? AND recipe_id = ?",
        collection.table()
    );

    let row = sqlx::query_as::<_, (i64,)>(&sql)
        .bind(user_id)
        .bind(recipe_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.is_some())
}

/// 장바구니에 담긴 모든 레시피의 재료 링크를 한 번에 가져옵니다.
///
/// 장바구니 → 레시피 → 재료 링크를 하나의 SELECT로 읽으므로
/// 도중에 장바구니가 바뀌어도 한 시점의 스냅샷만 보게 됩니다.
///
/// 순서: 장바구니에 담은 순서, 같은 레시피 안에서는 재료가 저장된 순서 (rowid).
pub async fn shopping_cart_ingredients(
    pool: &SqlitePool,
    user_id: &str,
) -> Result<Vec<RecipeIngredient>, AppError> {
    let lines = sqlx::query_as::<_, RecipeIngredient>(
        r#"
        SELECT i.id, i.name, i.measurement_unit, ri.amount
        FROM shopping_cart sc
        JOIN recipe_ingredients ri ON ri.recipe_id = sc.recipe_id
        JOIN ingredients i ON i.id = ri.ingredient_id
        WHERE sc.user_id = ?
        ORDER BY sc.rowid, ri.rowid
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(lines)
}
