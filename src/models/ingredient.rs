//! # 재료 모델 정의

use serde::{Deserialize, Serialize};

/// 재료 엔티티: `ingredients` 테이블 한 행
///
/// 관리자가 등록하는 불변 참조 데이터입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Ingredient {
    pub id: String,
    pub name: String,
    /// 측정 단위 (예: "g", "ml", "pcs")
    pub measurement_unit: String,
}

/// `GET /api/ingredients?name=...` 쿼리 파라미터
#[derive(Debug, Default, Deserialize)]
pub struct IngredientSearch {
    /// 이름에 포함된 문자열 (대소문자 무시)
    pub name: Option<String>,
}

/// 새 재료의 내용: 픽스처 로더가 사용합니다.
#[derive(Debug, Clone, Deserialize)]
pub struct NewIngredient {
    pub name: String,
    pub measurement_unit: String,
}
