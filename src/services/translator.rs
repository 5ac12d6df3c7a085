//! # 에러 번역기 (Error Translator)
//!
//! `AppError`를 공통 응답 전문과 HTTP 상태 코드로 바꿉니다.
//!
//! ## 분류 표 (위에서부터 먼저 일치하는 규칙 적용)
//! | 에러 | 상태 | code | message | debugMessage |
//! |------|------|------|---------|--------------|
//! | `MethodNotAllowed` | 405 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `TypeMismatch` | 400 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `ArgumentNotValid` | 400 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `Bind` | 400 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `NotReadable` | 400 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `ConstraintViolation` | 400 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `UnexpectedType` | 400 | `F03422` | `parameter.validate.failed` | 원인 포함 메시지 |
//! | `ResourceAccess` | 500 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//! | `Api` (BadRequest/NotFound/Conflict) | 400/404/409 | 예외 code | 예외 message | 예외 debugMessage |
//! | 그 외 | 500 | reason phrase | 에러 메시지 | 원인 포함 메시지 |
//!
//! `debugMessage`는 로컬/개발 환경에서만 응답에 실립니다.

use std::{error::Error as StdError, sync::Arc};

use axum::http::StatusCode;

use crate::{
    config::ActiveProfiles,
    error::{ApiErrorKind, AppError},
    models::ApiResponse,
    services::error_chain::{find_inner_cause, message_including_causes},
};

/// 검증기 타입 오류의 고정 에러 코드
pub const UNEXPECTED_TYPE_CODE: &str = "F03422";

/// 검증기 타입 오류의 고정 메시지 키
pub const UNEXPECTED_TYPE_MESSAGE: &str = "parameter.validate.failed";

/// 분류 결과. 디버깅 메시지는 아직 실행 환경으로 걸러지지 않은 상태입니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classified {
    /// 이 에러를 처리한 핸들러 이름 (로그용)
    pub handler: &'static str,
    pub status: StatusCode,
    pub code: String,
    pub message: String,
    pub debug_message: Option<String>,
}

impl Classified {
    /// 공통 응답 전문을 만듭니다. `expose_debug`가 false면 디버깅 메시지를 버립니다.
    pub fn into_envelope(self, expose_debug: bool) -> ApiResponse<()> {
        ApiResponse::error(
            self.status,
            self.code,
            self.message,
            self.debug_message.filter(|_| expose_debug),
        )
    }
}

/// 상태 코드의 reason phrase를 code로, 에러 메시지를 message로 쓰는 기본 분류
fn by_reason_phrase(handler: &'static str, status: StatusCode, error: &AppError) -> Classified {
    Classified {
        handler,
        status,
        code: status.canonical_reason().unwrap_or("Unknown").to_string(),
        message: error.to_string(),
        debug_message: Some(message_including_causes(error)),
    }
}

/// 에러를 분류합니다. 부수 효과가 없는 순수 함수입니다.
pub fn classify(error: &AppError) -> Classified {
    // match 팔의 순서가 곧 분류 우선순위입니다.
    // 컴파일러가 모든 variant를 처리했는지 검사하므로 새 에러 종류를 빠뜨릴 수 없습니다.
    match error {
        AppError::MethodNotAllowed(_) => by_reason_phrase(
            "handle_method_not_allowed",
            StatusCode::METHOD_NOT_ALLOWED,
            error,
        ),
        AppError::TypeMismatch(_) => {
            by_reason_phrase("handle_type_mismatch", StatusCode::BAD_REQUEST, error)
        }
        AppError::ArgumentNotValid(_) => {
            by_reason_phrase("handle_argument_not_valid", StatusCode::BAD_REQUEST, error)
        }
        AppError::Bind(_) => by_reason_phrase("handle_bind", StatusCode::BAD_REQUEST, error),
        AppError::NotReadable(_) => {
            by_reason_phrase("handle_not_readable", StatusCode::BAD_REQUEST, error)
        }
        AppError::ConstraintViolation(_) => {
            by_reason_phrase("handle_constraint_violation", StatusCode::BAD_REQUEST, error)
        }
        AppError::UnexpectedType(_) => Classified {
            handler: "handle_unexpected_type",
            status: StatusCode::BAD_REQUEST,
            code: UNEXPECTED_TYPE_CODE.to_string(),
            message: UNEXPECTED_TYPE_MESSAGE.to_string(),
            debug_message: Some(message_including_causes(error)),
        },
        AppError::ResourceAccess(_) => by_reason_phrase(
            "handle_resource_access",
            StatusCode::INTERNAL_SERVER_ERROR,
            error,
        ),
        AppError::Api(exception) => match exception.kind() {
            ApiErrorKind::BadRequest | ApiErrorKind::NotFound | ApiErrorKind::Conflict => {
                Classified {
                    handler: match exception.kind() {
                        ApiErrorKind::BadRequest => "handle_bad_request",
                        ApiErrorKind::NotFound => "handle_not_found",
                        _ => "handle_conflict",
                    },
                    status: exception.status(),
                    code: exception.code().to_string(),
                    message: exception.message().to_string(),
                    debug_message: exception.debug_message().map(str::to_string),
                }
            }
            ApiErrorKind::Unclassified => Classified {
                handler: "handle_runtime",
                status: StatusCode::INTERNAL_SERVER_ERROR,
                code: reason(StatusCode::INTERNAL_SERVER_ERROR),
                message: exception.message().to_string(),
                debug_message: Some(exception.message().to_string()),
            },
        },
        AppError::Internal(inner) => {
            // anyhow::Error::downcast_ref는 .context()로 감싼 원래 에러도 찾아 줍니다.
            // 다른 에러의 원인으로 숨어 있는 경우는 source() 체인을 직접 따라갑니다.
            let inner_ref: &(dyn StdError + 'static) = inner.as_ref();
            let downstream = inner.downcast_ref::<reqwest::Error>().is_some()
                || find_inner_cause::<reqwest::Error>(inner_ref).is_some();
            let handler = if downstream {
                "handle_resource_access"
            } else {
                "handle_runtime"
            };
            by_reason_phrase(handler, StatusCode::INTERNAL_SERVER_ERROR, error)
        }
    }
}

fn reason(status: StatusCode) -> String {
    status.canonical_reason().unwrap_or("Unknown").to_string()
}

/// 실행 환경을 알고 있는 에러 번역기
///
/// 시작 시 한 번 만들어지고, 요청마다 복제되어 쓰입니다 (`Arc`라 복제 비용이 작음).
#[derive(Debug, Clone, Default)]
pub struct ErrorTranslator {
    profiles: Arc<ActiveProfiles>,
}

impl ErrorTranslator {
    pub fn new(profiles: ActiveProfiles) -> Self {
        Self {
            profiles: Arc::new(profiles),
        }
    }

    pub fn profiles(&self) -> &ActiveProfiles {
        &self.profiles
    }

    /// 에러를 공통 응답과 상태 코드로 번역합니다.
    ///
    /// 에러 로그는 여기서 딱 한 번 남깁니다. 호출하는 쪽에서 따로 로그를 남기지 마세요.
    pub fn translate(&self, error: &AppError) -> (StatusCode, ApiResponse<()>) {
        let classified = classify(error);

        // 구조화된 필드(key = value)로 남겨서 로그 수집기에서 검색할 수 있게 합니다.
        // `%`는 Display, `?`는 Debug 형식으로 기록합니다.
        tracing::error!(
            handler = classified.handler,
            status = classified.status.as_u16(),
            code = %classified.code,
            chain = %message_including_causes(error),
            "#{}: {}",
            classified.handler,
            error,
        );

        let status = classified.status;
        (
            status,
            classified.into_envelope(self.profiles.exposes_debug_detail()),
        )
    }
}
