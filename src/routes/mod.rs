//! # 라우트 핸들러 모듈
//!
//! HTTP 요청을 처리하는 핸들러 함수들을 모아둔 모듈입니다.
//!
//! 각 하위 모듈:
//! - `health`: 서버 상태 확인, 버전
//! - `home`: 공통 응답/에러 번역 샘플 핸들러
//! - `downstream`: 로깅 클라이언트로 외부 API를 호출하는 중계 핸들러와 공유 상태(AppState)

pub mod downstream;
pub mod health;
pub mod home;

// main.rs / lib.rs에서 `routes::home`처럼 바로 접근 가능하게 재공개합니다.
pub use downstream::*;
pub use health::*;
pub use home::*;
