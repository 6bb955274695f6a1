//! # 레시피 모델 정의
//!
//! 레시피와 그 연관 데이터(재료 링크, 태그 링크)를 표현하는 구조체들입니다.
//!
//! ## 구조체 역할
//! - `RecipeRow`: `recipes` 테이블 한 행 (DB 조회용)
//! - `RecipeIngredient`: 레시피에 연결된 재료 + 수량 (조인 결과)
//! - `RecipeResponse`: 상세 응답 (태그, 작성자, 재료, 즐겨찾기/장바구니 여부 포함)
//! - `RecipeShort`: 즐겨찾기/장바구니/구독 미리보기에서 쓰는 짧은 표현
//! - `CreateRecipeRequest` / `UpdateRecipeRequest`: 요청 본문 DTO
//! - `RecipeFilter`: 목록 API의 필터 조건
//!
//! 요청 DTO는 DB에 닿기 전에 `validate()`로 검증합니다.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::{PageParams, Tag, UserResponse};

/// 조리 시간의 허용 범위 (분)
pub const COOKING_TIME_RANGE: std::ops::RangeInclusive<i64> = 1..=1000;
/// 재료 수량의 허용 범위
pub const AMOUNT_RANGE: std::ops::RangeInclusive<i64> = 1..=32767;
/// 레시피 이름의 최대 길이 (문자 수)
pub const MAX_NAME_LEN: usize = 200;

/// `recipes` 테이블 한 행
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecipeRow {
    pub id: String,
    pub author_id: String,
    pub name: String,
    /// media 디렉토리 기준 상대 경로 (예: "recipes/images/0190....png")
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// 레시피에 연결된 재료: `recipe_ingredients ⋈ ingredients` 조인 결과
///
/// `id`는 링크의 id가 아니라 재료(Ingredient)의 id입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RecipeIngredient {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// 레시피 상세 응답
#[derive(Debug, Clone, Serialize)]
pub struct RecipeResponse {
    pub id: String,
    pub tags: Vec<Tag>,
    pub author: UserResponse,
    pub ingredients: Vec<RecipeIngredient>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// 이미지 URL (예: "/media/recipes/images/0190....png")
    pub image: String,
    pub text: String,
    pub cooking_time: i64,
    pub pub_date: String,
}

/// 짧은 레시피 표현
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct RecipeShort {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: i64,
}

/// 요청 본문의 (재료 id, 수량) 한 쌍
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngredientAmount {
    pub id: String,
    pub amount: i64,
}

/// 레시피 생성 요청: `POST /api/recipes`
///
/// 문자열 필드에 `#[serde(default)]`를 둔 이유: 필드가 빠져도 JSON 파싱 단계(422)가 아니라
/// `validate()`에서 일관된 400 응답으로 거절하기 위해서입니다.
#[derive(Debug, Deserialize)]
pub struct CreateRecipeRequest {
    #[serde(default)]
    pub ingredients: Vec<IngredientAmount>,
    #[serde(default)]
    pub tags: Vec<String>,
    /// base64 data URL (예: "data:image/png;base64,iVBORw0...")
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub text: String,
    pub cooking_time: Option<i64>,
}

impl CreateRecipeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        validate_name(&self.name)?;
        require_text("text", &self.text)?;
        require_text("image", &self.image)?;
        let cooking_time = self
            .cooking_time
            .ok_or_else(|| AppError::BadRequest("cooking_time is required".to_string()))?;
        validate_cooking_time(cooking_time)?;
        if self.ingredients.is_empty() {
            return Err(AppError::BadRequest(
                "A recipe needs at least one ingredient".to_string(),
            ));
        }
        validate_ingredients(&self.ingredients)?;
        validate_tags(&self.tags)
    }
}

/// 레시피 수정 요청: `PATCH /api/recipes/{id}`
///
/// 모든 필드가 선택입니다. `ingredients`/`tags`는 비어 있지 않은 목록이 왔을 때만
/// 기존 링크 전체를 교체하고, 빠지거나 빈 목록이면 기존 링크를 그대로 둡니다.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateRecipeRequest {
    pub ingredients: Option<Vec<IngredientAmount>>,
    pub tags: Option<Vec<String>>,
    pub image: Option<String>,
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
}

impl UpdateRecipeRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name {
            validate_name(name)?;
        }
        if let Some(text) = &self.text {
            require_text("text", text)?;
        }
        if let Some(image) = &self.image {
            require_text("image", image)?;
        }
        if let Some(cooking_time) = self.cooking_time {
            validate_cooking_time(cooking_time)?;
        }
        if let Some(ingredients) = &self.ingredients {
            validate_ingredients(ingredients)?;
        }
        if let Some(tags) = &self.tags {
            validate_tags(tags)?;
        }
        Ok(())
    }

    /// 교체할 재료 목록. 빈 목록은 "변경 없음"으로 취급합니다.
    pub fn replacement_ingredients(&self) -> Option<&[IngredientAmount]> {
        self.ingredients.as_deref().filter(|list| !list.is_empty())
    }

    /// 교체할 태그 목록. 빈 목록은 "변경 없음"으로 취급합니다.
    pub fn replacement_tags(&self) -> Option<&[String]> {
        self.tags.as_deref().filter(|list| !list.is_empty())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    require_text("name", name)?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "name must be at most {} characters",
            MAX_NAME_LEN
        )));
    }
    Ok(())
}

fn require_text(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }
    Ok(())
}

fn validate_cooking_time(cooking_time: i64) -> Result<(), AppError> {
    if !COOKING_TIME_RANGE.contains(&cooking_time) {
        return Err(AppError::BadRequest(format!(
            "cooking_time must be between {} and {}",
            COOKING_TIME_RANGE.start(),
            COOKING_TIME_RANGE.end()
        )));
    }
    Ok(())
}

fn validate_ingredients(ingredients: &[IngredientAmount]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for ingredient in ingredients {
        if !AMOUNT_RANGE.contains(&ingredient.amount) {
            return Err(AppError::BadRequest(format!(
                "amount must be between {} and {}",
                AMOUNT_RANGE.start(),
                AMOUNT_RANGE.end()
            )));
        }
        // HashSet::insert는 이미 있던 값이면 false를 반환합니다.
        if !seen.insert(ingredient.id.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Ingredient {} is listed more than once",
                ingredient.id
            )));
        }
    }
    Ok(())
}

fn validate_tags(tags: &[String]) -> Result<(), AppError> {
    let mut seen = HashSet::new();
    for tag in tags {
        if !seen.insert(tag.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Tag {} is listed more than once",
                tag
            )));
        }
    }
    Ok(())
}

/// 레시피 목록 필터: `GET /api/recipes?author=..&tags=lunch&tags=dinner&is_favorited=1`
///
/// `tags`는 같은 키가 여러 번 올 수 있어서 `Query<Vec<(String, String)>>`로 받은 뒤
/// `from_query`로 해석합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<String>,
    pub name: Option<String>,
    /// 태그 slug 목록 (하나라도 맞으면 포함)
    pub tags: Vec<String>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl RecipeFilter {
    pub fn from_query(pairs: &[(String, String)]) -> Result<Self, AppError> {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "author" => filter.author = Some(value.clone()),
                "name" => filter.name = Some(value.clone()),
                "tags" => filter.tags.push(value.clone()),
                "is_favorited" => filter.is_favorited = parse_flag(key, value)?,
                "is_in_shopping_cart" => filter.is_in_shopping_cart = parse_flag(key, value)?,
                "page" => filter.page = Some(parse_number(key, value)?),
                "limit" => filter.limit = Some(parse_number(key, value)?),
                // 알 수 없는 파라미터는 무시합니다.
                _ => {}
            }
        }
        Ok(filter)
    }

    pub fn page_params(&self) -> PageParams {
        PageParams {
            page: self.page,
            limit: self.limit,
        }
    }
}

fn parse_flag(key: &str, value: &str) -> Result<bool, AppError> {
    match value {
        "1" | "true" | "True" => Ok(true),
        "0" | "false" | "False" => Ok(false),
        _ => Err(AppError::BadRequest(format!(
            "{} must be 0/1 or true/false",
            key
        ))),
    }
}

fn parse_number(key: &str, value: &str) -> Result<i64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::BadRequest(format!("{} must be a number", key)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn amount(id: &str, amount: i64) -> IngredientAmount {
        IngredientAmount {
            id: id.to_string(),
            amount,
        }
    }

    fn create_request() -> CreateRecipeRequest {
        CreateRecipeRequest {
            ingredients: vec![amount("flour", 200)],
            tags: vec!["t1".to_string()],
            image: "data:image/png;base64,AAAA".to_string(),
            name: "Pancakes".to_string(),
            text: "Mix and fry".to_string(),
            cooking_time: Some(20),
        }
    }

    #[test]
    fn create_request_passes_validation() {
        assert!(create_request().validate().is_ok());
    }

    #[test]
    fn cooking_time_bounds() {
        for (time, ok) in [(0, false), (1, true), (1000, true), (1001, false)] {
            let mut req = create_request();
            req.cooking_time = Some(time);
            assert_eq!(req.validate().is_ok(), ok, "cooking_time = {}", time);
        }

        let mut req = create_request();
        req.cooking_time = None;
        assert!(req.validate().is_err());
    }

    #[test]
    fn required_fields_on_create() {
        let mut req = create_request();
        req.name = "  ".to_string();
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.image = String::new();
        assert!(req.validate().is_err());

        let mut req = create_request();
        req.ingredients.clear();
        assert!(req.validate().is_err());
    }

    #[test]
    fn duplicate_ingredient_is_rejected() {
        let mut req = create_request();
        req.ingredients = vec![amount("flour", 200), amount("flour", 100)];
        assert!(matches!(req.validate(), Err(AppError::BadRequest(_))));
    }

    #[test]
    fn zero_amount_is_rejected() {
        let mut req = create_request();
        req.ingredients = vec![amount("flour", 0)];
        assert!(req.validate().is_err());
    }

    #[test]
    fn empty_lists_do_not_replace_links() {
        let req = UpdateRecipeRequest {
            ingredients: Some(vec![]),
            tags: None,
            ..Default::default()
        };
        assert!(req.validate().is_ok());
        assert!(req.replacement_ingredients().is_none());
        assert!(req.replacement_tags().is_none());

        let req = UpdateRecipeRequest {
            ingredients: Some(vec![amount("egg", 2)]),
            tags: Some(vec!["t1".to_string()]),
            ..Default::default()
        };
        assert_eq!(req.replacement_ingredients().map(|l| l.len()), Some(1));
        assert_eq!(req.replacement_tags().map(|l| l.len()), Some(1));
    }

    #[test]
    fn filter_collects_repeated_tags() {
        let pairs: Vec<(String, String)> = [
            ("tags", "breakfast"),
            ("tags", "lunch"),
            ("is_favorited", "1"),
            ("page", "2"),
            ("unknown", "x"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let filter = RecipeFilter::from_query(&pairs).unwrap();
        assert_eq!(filter.tags, vec!["breakfast", "lunch"]);
        assert!(filter.is_favorited);
        assert!(!filter.is_in_shopping_cart);
        assert_eq!(filter.page, Some(2));
    }

    #[test]
    fn filter_rejects_bad_flag() {
        let pairs = vec![("is_in_shopping_cart".to_string(), "maybe".to_string())];
        assert!(RecipeFilter::from_query(&pairs).is_err());
    }
}
