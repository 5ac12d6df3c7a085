//! # 응답 정규화 (Response Normalizer)
//!
//! 핸들러가 돌려준 성공 결과를 공통 응답(`ApiResponse`)으로 감쌀지 결정합니다.
//!
//! 다음 조건을 **모두** 만족할 때만 감쌉니다:
//! 1. Content-Type이 JSON 호환
//! 2. 상태 코드가 2xx
//! 3. 이미 공통 응답이 아님 (마커가 있거나, 본문 자체가 공통 응답 모양이면 이미 감싸진 것)
//! 4. 문자열 값이 아님
//!
//! 상태 코드는 읽기만 하고 절대 바꾸지 않습니다.

use axum::http::{HeaderValue, StatusCode};
use serde::Deserialize;
use serde_json::Value;

use crate::{models::ApiResponse, services::media_type::MediaType};

/// 정규화 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// 공통 응답으로 감쌈
    Wrapped(ApiResponse<Value>),
    /// 입력을 그대로 돌려줌
    Unchanged(Value),
}

/// 조건 1~3 (본문을 보지 않고 판단할 수 있는 부분)
pub fn should_wrap(
    content_type: Option<&HeaderValue>,
    status: StatusCode,
    already_wrapped: bool,
) -> bool {
    let json = MediaType::from_header(content_type).is_some_and(|media| media.is_json_compatible());
    json && status.is_success() && !already_wrapped
}

/// 공통 응답의 필드 이름 (`debugMessage`는 생략 가능)
const ENVELOPE_FIELDS: [&str; 4] = ["status", "code", "message", "data"];

/// 값이 이미 공통 응답 모양인지 확인합니다.
///
/// `Json(ApiResponse::success(..))`처럼 마커 없이 직렬화된 공통 응답을 알아보기 위한 검사입니다.
/// 필드 구성이 공통 응답과 정확히 같고, 본문의 `status`가 실제 상태 코드와 같아야 합니다.
pub fn is_envelope(value: &Value, status: StatusCode) -> bool {
    let Some(object) = value.as_object() else {
        return false;
    };
    let same_fields = ENVELOPE_FIELDS.iter().all(|field| object.contains_key(*field))
        && object
            .keys()
            .all(|key| ENVELOPE_FIELDS.contains(&key.as_str()) || key == "debugMessage");

    // 필드 이름만 같고 타입이 다른 값(예: status가 문자열)은 공통 응답이 아닙니다.
    same_fields
        && ApiResponse::<Value>::deserialize(value)
            .is_ok_and(|envelope| envelope.status == status.as_u16())
}

/// 결과 값을 정규화합니다.
pub fn normalize(
    value: Value,
    content_type: Option<&HeaderValue>,
    status: StatusCode,
    already_wrapped: bool,
) -> Normalized {
    let already_wrapped = already_wrapped || is_envelope(&value, status);
    if should_wrap(content_type, status, already_wrapped) && !value.is_string() {
        Normalized::Wrapped(ApiResponse::success(status, value))
    } else {
        Normalized::Unchanged(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{SUCCESS_CODE, SUCCESS_MESSAGE};
    use rstest::rstest;
    use serde_json::json;

    fn json_type() -> HeaderValue {
        HeaderValue::from_static("application/json")
    }

    #[rstest]
    #[case(StatusCode::OK)]
    #[case(StatusCode::CREATED)]
    #[case(StatusCode::ACCEPTED)]
    fn wraps_json_success_with_actual_status(#[case] status: StatusCode) {
        let value = json!({ "message": "hello" });
        let Normalized::Wrapped(body) = normalize(value.clone(), Some(&json_type()), status, false) else {
            panic!("expected wrapping");
        };
        assert_eq!(body.status, status.as_u16());
        assert_eq!(body.code, SUCCESS_CODE);
        assert_eq!(body.message, SUCCESS_MESSAGE);
        assert_eq!(body.debug_message, None);
        assert_eq!(body.data, Some(value));
    }

    #[rstest]
    #[case(json!("plain"), Some(json_type()), StatusCode::OK, false)]
    #[case(json!({ "a": 1 }), Some(json_type()), StatusCode::OK, true)]
    #[case(json!({ "a": 1 }), Some(json_type()), StatusCode::BAD_REQUEST, false)]
    #[case(json!({ "a": 1 }), Some(json_type()), StatusCode::FOUND, false)]
    #[case(json!({ "a": 1 }), Some(HeaderValue::from_static("text/plain")), StatusCode::OK, false)]
    #[case(json!({ "a": 1 }), None, StatusCode::OK, false)]
    fn leaves_value_untouched(
        #[case] value: Value,
        #[case] content_type: Option<HeaderValue>,
        #[case] status: StatusCode,
        #[case] already_wrapped: bool,
    ) {
        assert_eq!(
            normalize(value.clone(), content_type.as_ref(), status, already_wrapped),
            Normalized::Unchanged(value)
        );
    }

    #[test]
    fn leaves_serialized_envelope_untouched() {
        let envelope = serde_json::to_value(ApiResponse::success(StatusCode::OK, json!({ "a": 1 })))
            .unwrap();
        assert!(is_envelope(&envelope, StatusCode::OK));
        assert_eq!(
            normalize(envelope.clone(), Some(&json_type()), StatusCode::OK, false),
            Normalized::Unchanged(envelope)
        );
    }

    #[rstest]
    #[case::status_differs(
        json!({ "status": 201, "code": "SUCCESS", "message": "m", "data": 1 }),
        StatusCode::OK
    )]
    #[case::extra_field(
        json!({ "status": 200, "code": "SUCCESS", "message": "m", "data": 1, "page": 2 }),
        StatusCode::OK
    )]
    #[case::missing_data(json!({ "status": 200, "code": "SUCCESS", "message": "m" }), StatusCode::OK)]
    #[case::wrong_types(
        json!({ "status": "200", "code": "SUCCESS", "message": "m", "data": 1 }),
        StatusCode::OK
    )]
    fn wraps_values_that_only_resemble_envelopes(#[case] value: Value, #[case] status: StatusCode) {
        assert!(!is_envelope(&value, status));
        assert!(matches!(
            normalize(value, Some(&json_type()), status, false),
            Normalized::Wrapped(_)
        ));
    }

    #[test]
    fn wraps_problem_json_and_arrays() {
        let content_type = HeaderValue::from_static("application/problem+json");
        assert!(matches!(
            normalize(json!([1, 2]), Some(&content_type), StatusCode::OK, false),
            Normalized::Wrapped(_)
        ));
    }
}
