//! # 서비스 모듈
//!
//! DB 쿼리 이상의 로직을 담당합니다.
//! - `fixtures`: 태그/재료 초기 데이터 적재
//! - `images`: 레시피 이미지(data URL) 디코딩과 파일 저장
//! - `shopping_list`: 장바구니 재료 집계와 텍스트 리포트

pub mod fixtures;
pub mod images;
pub mod shopping_list;
