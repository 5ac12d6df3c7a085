//! # 요청 추출자(Extractor)
//!
//! axum 기본 추출자의 거부(rejection)를 `AppError`로 바꾸고, 필요하면 검증까지 수행합니다.
//! - `ApiPath<T>`: 경로 파라미터. 변환 실패 → `AppError::TypeMismatch`
//! - `ValidQuery<T>`: 쿼리 스트링. 바인딩 실패 → `Bind`, 검증 실패 → `ConstraintViolation`
//! - `ValidJson<T>`: JSON 본문. 파싱 실패 → `NotReadable`, 검증 실패 → `ArgumentNotValid`

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::{error::AppError, services::validation::Validate};

#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

#[derive(Debug)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate().map_err(AppError::from_param_validation)?;
        Ok(Self(value))
    }
}

#[derive(Debug)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state).await?;
        value.validate().map_err(AppError::from_body_validation)?;
        Ok(Self(value))
    }
}
