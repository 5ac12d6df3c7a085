//! # sample-api
//!
//! 모든 API 응답을 `{status, code, message, debugMessage, data}` 공통 응답으로 통일하는 샘플 서버.
//!
//! - 성공 결과는 공통 응답 미들웨어가 `data`로 감쌉니다.
//! - 에러는 `AppError`로 반환하면 에러 번역기가 상태 코드와 공통 응답으로 바꾸고 로그를 남깁니다.
//! - `debugMessage`는 로컬/개발 프로필에서만 나갑니다.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use axum::{middleware::from_fn_with_state, routing::get, routing::post, Router};
use tower_http::trace::{DefaultOnFailure, HttpMakeClassifier, TraceLayer};
use tracing::Level;

use crate::{config::ActiveProfiles, services::ErrorTranslator};

pub use crate::routes::AppState;

/// API 라우터를 만듭니다.
///
/// 공통 응답 미들웨어는 `.layer()`로 붙이므로 fallback(404)과 405 응답에도 적용됩니다.
/// `.with_state()`는 마지막에 호출해서 `Router<AppState>`를 `Router<()>`로 완성합니다.
pub fn app(profiles: ActiveProfiles, state: AppState) -> Router {
    let translator = ErrorTranslator::new(profiles);

    Router::new()
        .route("/", get(routes::home))
        .route("/bad-request", get(routes::bad_request))
        .route("/not-found", get(routes::not_found))
        .route("/conflict", get(routes::conflict))
        .route("/items/{id}", get(routes::get_item))
        .route("/search", get(routes::search))
        .route("/echo", post(routes::echo))
        .route("/health", get(routes::health_check))
        .route("/version", get(routes::version))
        .route("/downstream/{*path}", get(routes::relay))
        .fallback(routes::fallback)
        .method_not_allowed_fallback(routes::method_not_allowed)
        .layer(from_fn_with_state(translator, middleware::api_response))
        .with_state(state)
}

/// 서버 요청/응답 로그용 `TraceLayer`
///
/// 5xx 에러 로그는 에러 번역기가 ERROR 레벨로 한 번만 남깁니다.
/// 기본 on_failure(ERROR 레벨)가 같은 에러를 다시 남기지 않도록 DEBUG로 낮춥니다.
pub fn trace_layer() -> TraceLayer<HttpMakeClassifier> {
    TraceLayer::new_for_http().on_failure(DefaultOnFailure::new().level(Level::DEBUG))
}
