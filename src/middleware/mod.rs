//! # 미들웨어 모듈
//!
//! - `extract`: `AppError`로 거부하는 요청 추출자
//! - `response`: 성공 응답 정규화와 에러 번역을 함께 맡는 공통 응답 미들웨어

pub mod extract;
pub mod response;

pub use extract::{ApiPath, ValidJson, ValidQuery};
pub use response::api_response;
