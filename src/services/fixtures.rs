//! # 카탈로그 초기 데이터(픽스처) 로더
//!
//! 태그와 재료는 API로 만들 수 없는 참조 데이터입니다.
//! 서버 시작 시 `FIXTURES_PATH`의 JSON 파일을 읽어, 테이블이 비어 있을 때만 채웁니다.
//!
//! ```json
//! {
//!   "tags": [{ "name": "Breakfast", "color": "#E26C2D", "slug": "breakfast" }],
//!   "ingredients": [{ "name": "flour", "measurement_unit": "g" }]
//! }
//! ```

use crate::db;
use crate::models::{NewIngredient, NewTag};
use serde::Deserialize;
use sqlx::SqlitePool;

#[derive(Debug, Default, Deserialize)]
pub struct Fixtures {
    #[serde(default)]
    pub tags: Vec<NewTag>,
    #[serde(default)]
    pub ingredients: Vec<NewIngredient>,
}

impl Fixtures {
    pub fn parse(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// 픽스처 파일을 읽어 비어 있는 카탈로그 테이블을 채웁니다.
///
/// 이미 데이터가 있는 테이블은 건드리지 않으므로 재시작해도 중복되지 않습니다.
pub async fn load_fixtures(pool: &SqlitePool, path: &str) -> anyhow::Result<()> {
    let json = tokio::fs::read_to_string(path).await?;
    let fixtures = Fixtures::parse(&json)?;

    if db::count_tags(pool).await? == 0 {
        for tag in &fixtures.tags {
            db::create_tag(pool, tag).await?;
        }
        tracing::info!("Loaded {} tags from {}", fixtures.tags.len(), path);
    } else {
        tracing::debug!("Tags already present, skipping fixtures");
    }

    if db::count_ingredients(pool).await? == 0 {
        for ingredient in &fixtures.ingredients {
            db::create_ingredient(pool, ingredient).await?;
        }
        tracing::info!(
            "Loaded {} ingredients from {}",
            fixtures.ingredients.len(),
            path
        );
    } else {
        tracing::debug!("Ingredients already present, skipping fixtures");
    }

    Ok(())
}
