//! # 공통 API 응답(Envelope) 모델
//!
//! 모든 REST API 응답이 같은 모양의 JSON 전문으로 나가도록 하는 래퍼입니다.
//!
//! ```json
//! { "status": 200, "code": "SUCCESS", "message": "...", "data": { } }
//! { "status": 400, "code": "bad.request.error", "message": "...", "debugMessage": "...", "data": null }
//! ```
//!
//! `debugMessage`는 값이 없으면 JSON에서 필드 자체가 빠집니다 (`null`로 나가지 않음).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// 성공 응답의 `code`
pub const SUCCESS_CODE: &str = "SUCCESS";

/// 성공 응답의 고정 메시지
pub const SUCCESS_MESSAGE: &str = "정상적으로 처리되었습니다.";

/// 이미 공통 응답으로 감싸진 응답임을 표시하는 마커
///
/// `ApiResponse`를 `IntoResponse`로 변환할 때 응답 확장(extensions)에 들어가며,
/// 응답 정규화 미들웨어는 이 마커가 있는 응답을 다시 감싸지 않습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Enveloped;

/// Rest API 공통 응답 객체
///
/// `#[serde(rename_all = "camelCase")]`: Rust 필드 이름(snake_case)을
/// JSON 필드 이름(camelCase)으로 바꿉니다. `debug_message` → `debugMessage`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// HTTP 상태 코드. 실제 응답 상태 코드와 항상 같습니다.
    pub status: u16,

    /// 응답 코드 (`"SUCCESS"`, 애플리케이션 에러 코드, 또는 HTTP reason phrase)
    pub code: String,

    /// 응답 메시지
    pub message: String,

    /// 디버깅용 메시지 (로컬/개발 환경에서만 채워짐)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debug_message: Option<String>,

    /// 응답 바디. 에러 응답에서는 항상 `null`.
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    /// 성공 응답을 만듭니다. `status`는 이미 결정된 실제 응답 상태 코드입니다.
    pub fn success(status: StatusCode, data: T) -> Self {
        Self {
            status: status.as_u16(),
            code: SUCCESS_CODE.to_string(),
            message: SUCCESS_MESSAGE.to_string(),
            debug_message: None,
            data: Some(data),
        }
    }

    /// 데이터가 없는 에러 응답을 만듭니다.
    pub fn error(
        status: StatusCode,
        code: impl Into<String>,
        message: impl Into<String>,
        debug_message: Option<String>,
    ) -> Self {
        Self {
            status: status.as_u16(),
            code: code.into(),
            message: message.into(),
            debug_message,
            data: None,
        }
    }

    /// 본문의 `status`를 `StatusCode`로 돌려줍니다.
    /// 범위를 벗어난 값은 만들어질 수 없지만, 역직렬화된 값이라면 500으로 취급합니다.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self)).into_response();
        response.extensions_mut().insert(Enveloped);
        response
    }
}
