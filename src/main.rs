//! # Foodgram 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. SQLite 데이터베이스 연결 풀 생성
//! 4. 데이터베이스 마이그레이션 실행
//! 5. 이미지 저장 디렉토리 생성
//! 6. 태그/재료 픽스처 적재 (설정된 경우)
//! 7. API 라우터 설정 후 HTTP 서버 시작

use anyhow::Result; // anyhow::Result: 어떤 에러 타입이든 담을 수 있는 범용 Result 타입
use foodgram::{config::Config, db, routes::AppState, services::fixtures};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::{path::Path, str::FromStr};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // ── 1단계: 환경변수 로딩 ──
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // ── 2단계: 로깅(tracing) 초기화 ──
    // RUST_LOG가 없으면 foodgram, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "foodgram=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // ── 3단계: 설정 로딩 ──
    let config = Config::from_env()?;
    tracing::info!("Starting Foodgram server on {}:{}", config.host, config.port);

    // ── 4단계: SQLite 연결 풀 생성 ──
    // foreign_keys가 켜져 있어야 ON DELETE CASCADE가 동작합니다.
    let connect_options = SqliteConnectOptions::from_str(&config.database_url)?
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(connect_options)
        .await?;

    // ── 5단계: 데이터베이스 마이그레이션 실행 ──
    tracing::info!("Running database migrations...");
    db::run_migrations(&pool).await?;

    // ── 6단계: 이미지 저장 디렉토리 생성 ──
    let media_path = Path::new(&config.media_path);
    if !media_path.exists() {
        tokio::fs::create_dir_all(media_path).await?;
        tracing::info!("Created media directory: {}", config.media_path);
    }

    // ── 7단계: 카탈로그 픽스처 ──
    match &config.fixtures_path {
        Some(path) => fixtures::load_fixtures(&pool, path).await?,
        None => tracing::debug!("FIXTURES_PATH not set, skipping catalog fixtures"),
    }

    // ── 8단계: 애플리케이션 상태와 라우터 ──
    let state = AppState {
        pool,
        jwt_secret: config.jwt_secret.clone(),
        media_path: config.media_path.clone(),
        media_url: config.media_url.clone(),
        page_size: config.page_size,
    };
    let app = foodgram::build_app(state);

    // ── 9단계: 서버 시작 ──
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
