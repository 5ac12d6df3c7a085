//! # 공통 응답 미들웨어
//!
//! 모든 라우트 응답이 지나가는 마지막 관문입니다.
//! - 핸들러가 에러를 반환했으면 (`RaisedError`가 응답 확장에 있으면) 에러 번역기로 번역
//! - 아니면 응답 정규화 규칙에 따라 성공 결과를 공통 응답으로 감쌈
//!
//! `axum::middleware::from_fn_with_state(translator, api_response)`로 등록합니다.

use anyhow::Context;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::header::{ALLOW, CONTENT_LENGTH, CONTENT_TYPE},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::{
    error::{AppError, RaisedError},
    models::Enveloped,
    services::{
        normalizer::{self, Normalized},
        ErrorTranslator,
    },
};

/// 정규화를 위해 메모리에 올릴 수 있는 응답 본문의 최대 크기
///
/// Content-Length가 이보다 큰 응답은 감싸지 않고 그대로 보냅니다.
/// 길이를 모르는 스트리밍 본문이 이 크기를 넘으면 500 에러가 됩니다.
pub const MAX_NORMALIZED_BODY: usize = 16 * 1024 * 1024;

pub async fn api_response(
    State(translator): State<ErrorTranslator>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;

    // extensions는 타입을 키로 쓰는 맵입니다. remove로 꺼내면 바깥 레이어에는 남지 않습니다.
    if let Some(RaisedError(error)) = response.extensions_mut().remove::<RaisedError>() {
        return translate(&translator, &error, &response);
    }

    match normalize_response(response).await {
        Ok(response) => response,
        Err(error) => {
            let (_, body) = translator.translate(&error);
            body.into_response()
        }
    }
}

/// 에러 응답을 번역된 공통 응답으로 바꿉니다. 405의 `Allow` 헤더는 유지합니다.
fn translate(translator: &ErrorTranslator, error: &AppError, original: &Response) -> Response {
    let (_, body) = translator.translate(error);
    let mut response = body.into_response();
    if let Some(allow) = original.headers().get(ALLOW) {
        response.headers_mut().insert(ALLOW, allow.clone());
    }
    response
}

/// 성공 응답 정규화
///
/// 본문을 읽을 필요가 없는 응답은 그대로 통과시키고,
/// JSON으로 해석할 수 없는 본문도 원래 바이트 그대로 돌려줍니다.
pub async fn normalize_response(response: Response) -> Result<Response, AppError> {
    let already_wrapped = response.extensions().get::<Enveloped>().is_some();
    if !normalizer::should_wrap(
        response.headers().get(CONTENT_TYPE),
        response.status(),
        already_wrapped,
    ) {
        return Ok(response);
    }

    // 길이를 미리 알 수 있으면 버퍼링 전에 거릅니다.
    let declared_length = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<usize>().ok());
    if declared_length.is_some_and(|length| length > MAX_NORMALIZED_BODY) {
        tracing::debug!(
            length = ?declared_length,
            "Response body too large to normalize, passing through"
        );
        return Ok(response);
    }

    let (mut parts, body) = response.into_parts();
    let bytes = to_bytes(body, MAX_NORMALIZED_BODY)
        .await
        .context("failed to buffer response body for normalization")?;

    let value = match serde_json::from_slice(&bytes) {
        Ok(value) => value,
        Err(_) => return Ok(Response::from_parts(parts, Body::from(bytes))),
    };

    match normalizer::normalize(value, parts.headers.get(CONTENT_TYPE), parts.status, false) {
        Normalized::Unchanged(_) => Ok(Response::from_parts(parts, Body::from(bytes))),
        Normalized::Wrapped(envelope) => {
            let body = serde_json::to_vec(&envelope).context("failed to serialize envelope")?;
            parts.headers.remove(CONTENT_LENGTH);
            parts.extensions.insert(Enveloped);
            Ok(Response::from_parts(parts, Body::from(body)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ApiResponse;
    use axum::{
        http::{Request, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Json, Router,
    };
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn wraps_plain_json_and_keeps_status() {
        let response = (StatusCode::CREATED, Json(json!({ "id": 7 }))).into_response();
        let response = normalize_response(response).await.unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response.extensions().get::<Enveloped>().is_some());
        let body = body_json(response).await;
        assert_eq!(body["status"], 201);
        assert_eq!(body["code"], "SUCCESS");
        assert_eq!(body["data"], json!({ "id": 7 }));
        assert!(body.get("debugMessage").is_none());
    }

    #[tokio::test]
    async fn passes_text_and_json_strings_through() {
        let text = normalize_response("hello".into_response()).await.unwrap();
        let bytes = text.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"hello");

        let json_string = normalize_response(Json("raw").into_response()).await.unwrap();
        assert_eq!(body_json(json_string).await, json!("raw"));
    }

    #[tokio::test]
    async fn passes_oversized_bodies_through() {
        let declared = (MAX_NORMALIZED_BODY + 1).to_string();
        let response = (
            [(CONTENT_TYPE, "application/json"), (CONTENT_LENGTH, declared.as_str())],
            r#"{"a":1}"#,
        )
            .into_response();

        let response = normalize_response(response).await.unwrap();
        assert!(response.extensions().get::<Enveloped>().is_none());
        assert_eq!(response.headers()[CONTENT_LENGTH], declared.as_str());
    }

    #[tokio::test]
    async fn json_wrapped_envelope_from_handler_is_not_wrapped_again() {
        let app = Router::new()
            .route(
                "/",
                get(|| async { Json(ApiResponse::success(StatusCode::OK, json!({ "a": 1 }))) }),
            )
            .layer(from_fn_with_state(ErrorTranslator::default(), api_response));

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["code"], "SUCCESS");
        assert_eq!(body["data"], json!({ "a": 1 }));
    }

    #[tokio::test]
    async fn does_not_rewrap_envelopes() {
        let envelope = ApiResponse::success(StatusCode::OK, json!(1));
        let response = normalize_response(envelope.clone().into_response()).await.unwrap();
        let body = body_json(response).await;
        assert_eq!(body, serde_json::to_value(envelope).unwrap());
    }
}
