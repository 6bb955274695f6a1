//! # 재료 데이터베이스 쿼리 모듈

use crate::error::AppError;
use crate::models::*;
use sqlx::SqlitePool;

/// 재료 목록을 이름순으로 조회합니다.
///
/// `search`가 있으면 이름에 그 문자열이 들어 있는 재료만 반환합니다.
/// 대소문자는 `name_lower` 컬럼과 소문자로 바꾼 검색어를 비교해 무시하므로
/// 키릴 문자 같은 비ASCII 이름에도 동작합니다.
pub async fn list_ingredients(
    pool: &SqlitePool,
    search: Option<&str>,
) -> Result<Vec<Ingredient>, AppError> {
    let ingredients = match search.filter(|s| !s.is_empty()) {
        Some(search) => {
            sqlx::query_as::<_, Ingredient>(
                r#"
                SELECT id, name, measurement_unit
                FROM ingredients
                WHERE name_lower LIKE ? ESCAPE '\'
                ORDER BY name
                "#,
            )
            .bind(format!("%{}%", escape_like(&search.to_lowercase())))
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, Ingredient>(
                "SELECT id, name, measurement_unit FROM ingredients ORDER BY name",
            )
            .fetch_all(pool)
            .await?
        }
    };

    Ok(ingredients)
}

pub async fn get_ingredient(pool: &SqlitePool, id: &str) -> Result<Option<Ingredient>, AppError> {
    let ingredient = sqlx::query_as::<_, Ingredient>(
        "SELECT id, name, measurement_unit FROM ingredients WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(ingredient)
}

pub async fn create_ingredient(
    pool: &SqlitePool,
    new_ingredient: &NewIngredient,
) -> Result<Ingredient, AppError> {
    let id = uuid::Uuid::now_v7().to_string();

    sqlx::query(
        "INSERT INTO ingredients (id, name, name_lower, measurement_unit) VALUES (?, ?, ?, ?)",
    )
    .bind(&id)
    .bind(&new_ingredient.name)
    .bind(new_ingredient.name.to_lowercase())
    .bind(&new_ingredient.measurement_unit)
    .execute(pool)
    .await?;

    get_ingredient(pool, &id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created ingredient".to_string()))
}

pub async fn count_ingredients(pool: &SqlitePool) -> Result<i64, AppError> {
    let (count,) = sqlx::query_as::<_, (i64,)>("SELECT COUNT(*) FROM ingredients")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// LIKE 패턴의 와일드카드(`%`, `_`)와 이스케이프 문자를 문자 그대로 취급하게 만듭니다.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_escaped() {
        assert_eq!(escape_like("sug"), "sug");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
    }
}
