//! # 데이터베이스 접근 계층 (Data Access Layer)
//!
//! 데이터베이스와 직접 상호작용하는 함수들을 모아둔 모듈입니다.
//! 라우트 핸들러(routes/)에서 이 모듈의 함수를 호출하여 DB 작업을 수행합니다.
//! 모든 함수는 평범한 값 구조체(`models`)를 반환하며, 엔티티가 스스로 저장되지는 않습니다.
//!
//! 각 하위 모듈:
//! - `collections`: 즐겨찾기와 장바구니 (사용자 × 레시피 조인 테이블)
//! - `follows`: 구독(팔로우) 관계
//! - `ingredients`: 재료 카탈로그
//! - `recipes`: 레시피와 재료/태그 링크
//! - `tags`: 태그 카탈로그
//! - `users`: 사용자와 리프레시 토큰

pub mod collections;
pub mod follows;
pub mod ingredients;
pub mod recipes;
pub mod tags;
pub mod users;

pub use collections::*;
pub use follows::*;
pub use ingredients::*;
pub use recipes::*;
pub use tags::*;

use crate::error::AppError;
use sqlx::SqlitePool;

/// `./migrations`의 SQL 파일을 컴파일 타임에 포함시키고, 아직 적용되지 않은 것만 실행합니다.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// UNIQUE 제약 위반을 `AppError::Conflict`로 바꿉니다.
///
/// 조인 테이블의 중복 방지는 DB 제약에 맡기므로, 동시에 들어온 같은 요청 중
/// 하나는 여기서 충돌 에러가 됩니다. 다른 DB 에러는 그대로 `Database`로 전달합니다.
pub(crate) fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            AppError::Conflict(message.to_string())
        }
        _ => AppError::Database(err),
    }
}
