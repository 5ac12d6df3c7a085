//! # sample-api 웹 서버 진입점
//!
//! 이 파일이 수행하는 작업:
//! 1. 환경변수(.env) 로딩
//! 2. 로깅(tracing) 초기화
//! 3. 설정 로딩 및 활성 프로필 출력
//! 4. 외부 호출 클라이언트(AppState) 생성
//! 5. API 라우터 + CORS/Trace 미들웨어 설정
//! 6. HTTP 서버 시작 (Ctrl+C로 정상 종료)

use anyhow::Result;
use sample_api::{config::Config, AppState};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env 파일이 없어도 에러 없이 넘어갑니다.
    dotenvy::dotenv().ok();

    // RUST_LOG가 없으면 sample_api, tower_http, axum 모듈을 debug 레벨로 설정
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sample_api=debug,tower_http=debug,axum=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(
        profiles = ?config.profiles.profiles(),
        active = ?config.profiles.active_profile(),
        debug_detail = config.profiles.exposes_debug_detail(),
        "Active profiles loaded"
    );

    // 타임아웃과 응답 버퍼링 여부는 HTTP_CLIENT_* 환경변수에서 옵니다.
    let state = AppState::from_config(&config)?;
    tracing::info!(
        downstream = config.downstream_base_url.as_deref().unwrap_or("[disabled]"),
        timeout_secs = config.http_client_timeout.as_secs(),
        "Downstream client ready"
    );

    // 개발 환경에서는 Any(모두 허용). 운영에서는 특정 도메인만 허용해야 합니다.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = sample_api::app(config.profiles.clone(), state)
        .layer(cors)
        .layer(sample_api::trace_layer());

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "Failed to listen for shutdown signal");
    }
}
