//! # 외부 API 중계 핸들러
//!
//! `GET /downstream/{*path}` → `DOWNSTREAM_BASE_URL/{path}`를 `LoggingClient`로 호출하고,
//! 받은 JSON을 그대로 돌려줍니다 (공통 응답 미들웨어가 `data`로 감쌈).
//!
//! - 연결 실패/타임아웃: `reqwest::Error` → `AppError::ResourceAccess` (500)
//! - 업스트림이 2xx가 아니거나 JSON이 아님: `AppError::Internal` (500)
//! - `DOWNSTREAM_BASE_URL` 미설정: 404 `downstream.not.configured`

use anyhow::anyhow;
use axum::{extract::State, Json};
use serde_json::Value;

use crate::{
    config::Config,
    error::{ApiErrorKind, ApiException, AppError},
    middleware::ApiPath,
    services::LoggingClient,
};

// #[derive(Clone)]: Axum의 State 추출자는 요청마다 AppState를 clone합니다.
// LoggingClient 안의 reqwest::Client는 Arc로 커넥션 풀을 공유하므로 clone 비용이 작습니다.

/// 애플리케이션 공유 상태
///
/// 핸들러는 `State(state): State<AppState>`로 접근합니다.
#[derive(Debug, Clone)]
pub struct AppState {
    /// 요청/응답을 로그로 남기는 외부 호출 클라이언트
    pub client: LoggingClient,
    /// 중계 대상 API의 기본 URL (없으면 중계 비활성)
    pub downstream_base_url: Option<String>,
}

impl AppState {
    pub fn new(client: LoggingClient, downstream_base_url: Option<String>) -> Self {
        Self {
            client,
            downstream_base_url,
        }
    }

    /// 설정의 타임아웃/버퍼링 플래그로 클라이언트를 만들어 상태를 구성합니다.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self::new(
            LoggingClient::from_config(config)?,
            config.downstream_base_url.clone(),
        ))
    }
}

/// `GET /downstream/{*path}`
pub async fn relay(
    State(state): State<AppState>,
    ApiPath(path): ApiPath<String>,
) -> Result<Json<Value>, AppError> {
    let Some(base) = state.downstream_base_url.as_deref() else {
        return Err(ApiException::with_debug(
            ApiErrorKind::NotFound,
            "downstream.not.configured",
            "downstream.not.configured",
            "DOWNSTREAM_BASE_URL is not set",
        )
        .into());
    };

    // base 끝의 '/'와 path 앞의 '/'가 겹치지 않게 한 번만 이어 붙입니다.
    let url = format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    );

    // 전송 단계의 reqwest::Error는 `?`에서 From 변환으로 ResourceAccess가 됩니다.
    let response = state.client.send(state.client.get(&url)).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(anyhow!("downstream {url} answered {status}").into());
    }

    Ok(Json(response.json().await?))
}
