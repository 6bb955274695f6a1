//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `DATABASE_URL`: SQLite 데이터베이스 경로 (필수)
//! - `JWT_SECRET`: JWT 토큰 서명에 사용할 비밀키 (필수)
//! - `MEDIA_PATH`: 레시피 이미지 저장 디렉토리
//! - `MEDIA_URL`: 이미지가 서빙되는 URL 접두사
//! - `PAGE_SIZE`: 목록 API의 기본 페이지 크기
//! - `FIXTURES_PATH`: 태그/재료 초기 데이터 JSON 파일 (선택)
//! - `HOST`, `PORT`: 서버 바인딩 주소

use std::env;

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite 데이터베이스 주소 (예: "sqlite:data/foodgram.db?mode=rwc")
    pub database_url: String,
    /// JWT 토큰 서명/검증에 사용하는 비밀키
    pub jwt_secret: String,
    /// 업로드된 레시피 이미지가 저장되는 디렉토리
    pub media_path: String,
    /// 이미지 URL 접두사 (기본값: "/media")
    pub media_url: String,
    /// 페이지당 기본 항목 수 (기본값: 6)
    pub page_size: i64,
    /// 태그/재료 픽스처 파일 경로. 없으면 초기 데이터를 적재하지 않습니다.
    pub fixtures_path: Option<String>,
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 3000)
    pub port: u16,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// # 에러
    /// `DATABASE_URL`과 `JWT_SECRET`은 필수이며, 없으면 에러가 발생합니다.
    /// 나머지 설정은 기본값이 있어 환경변수가 없어도 동작합니다.
    pub fn from_env() -> Result<Self, env::VarError> {
        Ok(Self {
            database_url: env::var("DATABASE_URL")?,
            jwt_secret: env::var("JWT_SECRET")?,
            media_path: env::var("MEDIA_PATH").unwrap_or_else(|_| "data/media".to_string()),
            media_url: env::var("MEDIA_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "/media".to_string()),
            // 0 이하의 값은 쓸모가 없으므로 기본값으로 되돌립니다.
            page_size: env::var("PAGE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|size: &i64| *size > 0)
                .unwrap_or(6),
            // .ok(): 환경변수가 없으면 None
            fixtures_path: env::var("FIXTURES_PATH").ok(),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .unwrap_or(3000),
        })
    }
}
