//! # 태그 모델 정의
//!
//! 태그(Tag)는 레시피를 분류하는 참조 데이터입니다. (예: "아침", "#E26C2D", "breakfast")
//! API에서는 읽기 전용이며, 픽스처 로더로만 생성됩니다.

use serde::{Deserialize, Serialize};

/// 태그 엔티티: DB의 `tags` 테이블 한 행(row)에 대응합니다.
///
/// # derive 매크로 설명
/// - `Serialize`: API 응답(JSON)으로 변환
/// - `sqlx::FromRow`: SQL 쿼리 결과(행)를 이 구조체로 자동 매핑
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Tag {
    /// 태그 고유 식별자 (UUIDv7 형식 문자열)
    pub id: String,
    /// 태그 이름 (고유)
    pub name: String,
    /// HEX 색상 코드 (고유, 예: "#49B64E")
    pub color: String,
    /// URL 필터에 쓰이는 slug (고유, 예: "breakfast")
    pub slug: String,
}

/// 새 태그의 내용: 픽스처 로더가 `db::create_tag`에 넘기는 값입니다.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    /// 없으면 이름으로부터 생성합니다.
    pub slug: Option<String>,
}

/// `#RGB` 또는 `#RRGGBB` 형식의 HEX 색상인지 확인합니다.
pub fn is_hex_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => {
            (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        assert!(is_hex_color("#49B64E"));
        assert!(is_hex_color("#fff"));
        assert!(!is_hex_color("49B64E"));
        assert!(!is_hex_color("#49B64"));
        assert!(!is_hex_color("#GGGGGG"));
    }
}
