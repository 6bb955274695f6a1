//! # 미들웨어 모듈
//!
//! - `auth`: JWT 발급/검증과 현재 사용자 추출자(`AuthUser`, `MaybeAuthUser`)

pub mod auth;
