//! # 샘플 API 라우트 핸들러
//!
//! 공통 응답과 에러 번역을 확인하기 위한 핸들러들입니다.
//!
//! ## 엔드포인트 목록
//! | 메서드 | 경로 | 핸들러 | 설명 |
//! |--------|------|--------|------|
//! | GET | / | `home` | hello world 응답 |
//! | GET | /bad-request | `bad_request` | 400 애플리케이션 예외 |
//! | GET | /not-found | `not_found` | 404 애플리케이션 예외 |
//! | GET | /conflict | `conflict` | 409 애플리케이션 예외 |
//! | GET | /items/{id} | `get_item` | 경로 파라미터 타입 변환 |
//! | GET | /search | `search` | 쿼리 바인딩 + 검증 |
//! | POST | /echo | `echo` | JSON 본문 파싱 + 검증, 201 응답 |
//!
//! 핸들러는 결과 값만 반환합니다. 공통 응답으로 감싸는 일은 미들웨어가 맡습니다.

use axum::{
    http::{Method, StatusCode, Uri},
    Json,
};

use crate::{
    error::{ApiErrorKind, ApiException, AppError},
    middleware::{ApiPath, ValidJson, ValidQuery},
    models::*,
};

/// `GET /` → `{ "uuid": "...", "message": "hello world!" }`
pub async fn home() -> Json<HomeResponse> {
    Json(HomeResponse::new("hello world!"))
}

/// `GET /bad-request` — 항상 400
pub async fn bad_request() -> Result<(), AppError> {
    Err(ApiException::bad_request(
        "bad.request.error",
        "badRequest test",
        "handler badRequest() executed",
    )
    .into())
}

/// `GET /not-found` — 항상 404
pub async fn not_found() -> Result<(), AppError> {
    Err(ApiException::not_found(
        "not.found.error",
        "notFound test",
        "handler notFound() executed",
    )
    .into())
}

/// `GET /conflict` — 항상 409
pub async fn conflict() -> Result<(), AppError> {
    Err(ApiException::conflict(
        "conflict.error",
        "conflict test",
        "handler conflict() executed",
    )
    .into())
}

/// `GET /items/{id}`
///
/// `id`가 u64로 변환되지 않으면 (예: `/items/abc`) 400 TypeMismatch가 됩니다.
pub async fn get_item(ApiPath(id): ApiPath<u64>) -> Json<ItemResponse> {
    Json(ItemResponse { id })
}

/// `GET /search?keyword=...&page=...`
pub async fn search(ValidQuery(query): ValidQuery<SearchQuery>) -> Json<SearchResponse> {
    Json(SearchResponse {
        keyword: query.keyword,
        page: query.page.unwrap_or(1),
    })
}

/// `POST /echo` → `201 Created` + 요청 본문 그대로
pub async fn echo(ValidJson(request): ValidJson<EchoRequest>) -> (StatusCode, Json<EchoRequest>) {
    (StatusCode::CREATED, Json(request))
}

/// 일치하는 라우트가 없을 때
pub async fn fallback(uri: Uri) -> AppError {
    ApiException::with_debug(
        ApiErrorKind::NotFound,
        "Not Found",
        "Not Found",
        format!("No handler found for {}", uri.path()),
    )
    .into()
}

/// 경로는 있지만 메서드가 맞지 않을 때
pub async fn method_not_allowed(method: Method) -> AppError {
    AppError::MethodNotAllowed(method)
}
