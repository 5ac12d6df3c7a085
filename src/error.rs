//! # 에러 처리 모듈
//!
//! 요청 처리 중 발생할 수 있는 모든 에러 타입을 정의합니다.
//! Rust에서는 예외(exception) 대신 `Result<T, E>` 타입으로 에러를 처리합니다.
//!
//! 이 모듈의 핵심:
//! - `ApiException`: 비즈니스 규칙 위반을 나타내는 애플리케이션 예외 (kind + code + message)
//! - `AppError` 열거형(enum): 프레임워크/외부 호출/애플리케이션 에러를 하나의 타입으로 통합
//! - `IntoResponse` 구현: 상태 코드를 정하고, 에러 자체는 응답 확장(extensions)에 실어
//!   공통 응답 미들웨어가 번역하도록 넘깁니다.

use std::{error::Error as StdError, sync::Arc};

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection}, // 기본 추출자의 거부(rejection) 타입
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error; // std::error::Error + Display 자동 구현

use crate::services::{translator, validation::ValidationError};

/// 애플리케이션 예외의 종류. 종류마다 HTTP 상태 코드가 고정되어 있습니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// 400
    BadRequest,
    /// 404
    NotFound,
    /// 409
    Conflict,
    /// 500. 분류되지 않은 런타임 오류로 취급됩니다.
    Unclassified,
}

impl ApiErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorKind::NotFound => StatusCode::NOT_FOUND,
            ApiErrorKind::Conflict => StatusCode::CONFLICT,
            ApiErrorKind::Unclassified => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 비즈니스 로직에서 잘못된 상태를 발견했을 때 던지는 애플리케이션 예외
///
/// 만든 곳에서 `?`로 그대로 전파되고, 에러 번역기에서 딱 한 번 소비됩니다.
///
/// ```ignore
/// return Err(ApiException::not_found("user.not.found", "사용자가 없습니다", format!("id={id}")).into());
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct ApiException {
    kind: ApiErrorKind,
    code: String,
    message: String,
    debug_message: Option<String>,
    // thiserror는 `source`라는 이름의 필드를 원인으로 인식해서 `Error::source()`를 구현합니다.
    // Box<dyn Error + Send + Sync>: 어떤 에러 타입이든 담을 수 있고 스레드 간에 옮길 수 있습니다.
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl ApiException {
    /// 코드만 있는 예외. 메시지는 코드와 같고 디버깅 메시지는 없습니다.
    pub fn new(kind: ApiErrorKind, code: impl Into<String>) -> Self {
        let code = code.into();
        Self {
            kind,
            message: code.clone(),
            code,
            debug_message: None,
            source: None,
        }
    }

    /// 메시지를 지정한 예외. 디버깅 메시지는 메시지와 같게 채워집니다.
    pub fn with_message(
        kind: ApiErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        Self {
            kind,
            code: code.into(),
            debug_message: Some(message.clone()),
            message,
            source: None,
        }
    }

    /// 메시지와 디버깅 메시지를 모두 지정한 예외
    pub fn with_debug(
        kind: ApiErrorKind,
        code: impl Into<String>,
        message: impl Into<String>,
        debug_message: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            code: code.into(),
            message: message.into(),
            debug_message: Some(debug_message.into()),
            source: None,
        }
    }

    /// 원인 에러를 붙입니다.
    ///
    /// `mut self`로 값을 받아 고친 뒤 돌려주므로 생성자 뒤에 바로 체이닝할 수 있습니다.
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn bad_request(
        code: impl Into<String>,
        message: impl Into<String>,
        debug_message: impl Into<String>,
    ) -> Self {
        Self::with_debug(ApiErrorKind::BadRequest, code, message, debug_message)
    }

    pub fn not_found(
        code: impl Into<String>,
        message: impl Into<String>,
        debug_message: impl Into<String>,
    ) -> Self {
        Self::with_debug(ApiErrorKind::NotFound, code, message, debug_message)
    }

    pub fn conflict(
        code: impl Into<String>,
        message: impl Into<String>,
        debug_message: impl Into<String>,
    ) -> Self {
        Self::with_debug(ApiErrorKind::Conflict, code, message, debug_message)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    pub fn status(&self) -> StatusCode {
        self.kind.status()
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn debug_message(&self) -> Option<&str> {
        self.debug_message.as_deref()
    }
}

/// 요청 처리 중 발생할 수 있는 모든 에러 종류
///
/// variant 선언 순서는 에러 번역기의 분류 우선순위와 같습니다.
/// 핸들러에서 `Result<T, AppError>`를 반환하면,
/// Axum이 자동으로 `IntoResponse`를 호출하여 HTTP 응답으로 변환합니다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 라우트는 있지만 지원하지 않는 HTTP 메서드 (405)
    #[error("Request method '{0}' is not supported")]
    MethodNotAllowed(Method),

    /// 경로 파라미터 타입 변환 실패 (400)
    /// #[error(transparent)]: 메시지와 source()를 내부 에러에 그대로 위임합니다.
    #[error(transparent)]
    TypeMismatch(#[from] PathRejection),

    /// 요청 본문(JSON) 검증 실패 (400)
    #[error(transparent)]
    ArgumentNotValid(ValidationError),

    /// 쿼리 스트링 바인딩 실패 (400)
    #[error(transparent)]
    Bind(#[from] QueryRejection),

    /// 요청 본문을 읽거나 파싱할 수 없음 (400)
    #[error(transparent)]
    NotReadable(#[from] JsonRejection),

    /// 쿼리 파라미터 검증 실패 (400)
    #[error(transparent)]
    ConstraintViolation(ValidationError),

    /// 검증 규칙을 적용할 수 없는 타입 (400, F03422)
    #[error(transparent)]
    UnexpectedType(ValidationError),

    /// 외부 자원(HTTP) 호출 실패 (500)
    #[error("I/O error on downstream request")]
    ResourceAccess(#[from] reqwest::Error),

    /// 애플리케이션 예외 (400/404/409/500)
    #[error(transparent)]
    Api(#[from] ApiException),

    /// 그 밖의 모든 오류 (500)
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 요청 본문 검증 결과를 에러로 바꿉니다.
    pub fn from_body_validation(error: ValidationError) -> Self {
        match error {
            ValidationError::Invalid(_) => AppError::ArgumentNotValid(error),
            ValidationError::UnexpectedType { .. } => AppError::UnexpectedType(error),
        }
    }

    /// 쿼리 파라미터 검증 결과를 에러로 바꿉니다.
    pub fn from_param_validation(error: ValidationError) -> Self {
        match error {
            ValidationError::Invalid(_) => AppError::ConstraintViolation(error),
            ValidationError::UnexpectedType { .. } => AppError::UnexpectedType(error),
        }
    }
}

/// 응답 확장에 실려 미들웨어로 전달되는 에러
#[derive(Debug, Clone)]
pub struct RaisedError(pub Arc<AppError>);

impl IntoResponse for AppError {
    /// 에러를 HTTP 응답으로 변환합니다.
    ///
    /// 본문은 운영 환경 기준(디버깅 메시지 없음)으로 만들어 두고,
    /// 에러 자체는 `RaisedError`로 응답 확장에 넣습니다.
    /// 공통 응답 미들웨어가 이를 꺼내 실행 환경에 맞춰 다시 번역하고 로그를 남깁니다.
    fn into_response(self) -> Response {
        // IntoResponse는 실행 환경(프로필)을 알 수 없으므로 여기서는 로그도 남기지 않습니다.
        // Arc: 응답 확장에 넣는 값은 Clone이어야 하는데, AppError는 Clone이 아닙니다.
        let classified = translator::classify(&self);
        let mut response = classified.into_envelope(false).into_response();
        response.extensions_mut().insert(RaisedError(Arc::new(self)));
        response
    }
}
