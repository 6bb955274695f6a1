//! # 데이터 모델 모듈
//!
//! 애플리케이션에서 사용하는 데이터 구조체(struct)들을 정의합니다.
//! 각 하위 모듈은 특정 도메인의 데이터 타입을 담당합니다:
//! - `ingredient`: 재료(Ingredient) 참조 데이터
//! - `page`: 페이지네이션 요청/응답
//! - `recipe`: 레시피와 요청 DTO, 목록 필터
//! - `tag`: 태그 참조 데이터
//! - `user`: 사용자, 인증, 구독 관련 구조체
//!
//! `pub use X::*;`로 재공개하므로 `crate::models::Recipe...`처럼 짧게 접근할 수 있습니다.

pub mod ingredient;
pub mod page;
pub mod recipe;
pub mod tag;
pub mod user;

pub use ingredient::*;
pub use page::*;
pub use recipe::*;
pub use tag::*;
pub use user::*;
