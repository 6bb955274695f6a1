//! # 페이지네이션 모델
//!
//! 목록 API(레시피, 사용자, 구독)는 페이지 번호 기반으로 나뉩니다.
//!
//! ```text
//! GET /api/recipes?page=2&limit=6
//! → { "count": 14, "next": 3, "previous": 1, "results": [...] }
//! ```

use serde::{Deserialize, Serialize};

/// `limit`의 상한값
pub const MAX_PAGE_SIZE: i64 = 100;

/// 쿼리 문자열의 `page`/`limit` 값
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// 1부터 시작하는 페이지 번호
    pub page: Option<i64>,
    /// 페이지 크기. 없으면 설정값(`PAGE_SIZE`)을 사용합니다.
    pub limit: Option<i64>,
}

/// 실제 SQL에 넣을 LIMIT/OFFSET으로 해석된 페이지 정보
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    pub page: i64,
    pub size: i64,
}

impl PageWindow {
    /// SQL OFFSET 값. 아주 큰 페이지 번호는 i64 최댓값에서 멈추므로 빈 페이지가 됩니다.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.size)
    }
}

impl PageParams {
    /// 잘못된 값(0, 음수)은 기본값으로, 너무 큰 limit은 상한값으로 보정합니다.
    pub fn window(&self, default_size: i64) -> PageWindow {
        let page = self.page.filter(|p| *p > 0).unwrap_or(1);
        let size = self
            .limit
            .filter(|l| *l > 0)
            .unwrap_or(default_size)
            .clamp(1, MAX_PAGE_SIZE);
        PageWindow { page, size }
    }
}

/// 한 페이지 분량의 결과
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// 전체 항목 수
    pub count: i64,
    /// 다음 페이지 번호 (마지막 페이지면 null)
    pub next: Option<i64>,
    /// 이전 페이지 번호 (첫 페이지면 null)
    pub previous: Option<i64>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn new(results: Vec<T>, count: i64, window: PageWindow) -> Self {
        let next = (window.page.saturating_mul(window.size) < count).then_some(window.page + 1);
        let previous = (window.page > 1).then_some(window.page - 1);
        Self {
            count,
            next,
            previous,
            results,
        }
    }
}
