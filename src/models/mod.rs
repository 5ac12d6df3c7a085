//! # 데이터 모델 모듈
//!
//! API 요청/응답에 쓰이는 구조체들을 정의합니다.
//! - `response`: 모든 응답이 공유하는 공통 응답 전문(`ApiResponse`)
//! - `home`: 샘플 핸들러의 요청/응답 구조체
//!
//! `pub use X::*;`는 하위 모듈의 모든 공개 항목을
//! 이 모듈에서 바로 접근할 수 있게 재공개(re-export)합니다.

pub mod home;
pub mod response;

pub use home::*;
pub use response::*;
