//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//! Axum에서 핸들러는 HTTP 요청을 받아 응답을 반환하는 async 함수입니다.
//!
//! 각 하위 모듈:
//! - `auth`: 회원가입, 로그인, 토큰 갱신, 로그아웃
//! - `collections`: 즐겨찾기, 장바구니, 쇼핑 리스트 다운로드
//! - `health`: 서버 상태 확인 (헬스체크)
//! - `ingredients`: 재료 카탈로그 조회
//! - `recipes`: 레시피 CRUD, 앱 공유 상태(`AppState`)
//! - `tags`: 태그 카탈로그 조회
//! - `users`: 사용자 프로필, 비밀번호 변경, 구독

pub mod auth;
pub mod collections;
pub mod health;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

// 각 모듈의 핸들러 함수들을 재공개하여
// lib.rs에서 `routes::list_recipes`처럼 바로 접근 가능하게 합니다.
// auth와 users는 이름이 겹치지 않도록 모듈 경로로 씁니다.
pub use collections::*;
pub use health::*;
pub use ingredients::*;
pub use recipes::*;
pub use tags::*;
