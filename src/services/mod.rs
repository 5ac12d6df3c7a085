//! # 서비스 모듈
//!
//! 핸들러와 HTTP 전송 계층 사이에서 쓰이는 순수 로직과 외부 연동을 모아둔 모듈입니다.
//! - `error_chain`: 에러 원인 체인 탐색
//! - `http_client`: 외부 HTTP 호출 로깅 클라이언트
//! - `media_type`: Content-Type 해석
//! - `normalizer`: 성공 응답을 공통 응답으로 감쌀지 결정
//! - `translator`: 에러를 공통 응답으로 번역
//! - `validation`: 요청 값 검증

pub mod error_chain;
pub mod http_client;
pub mod media_type;
pub mod normalizer;
pub mod translator;
pub mod validation;

pub use http_client::{ClientResponse, LoggingClient};
pub use translator::ErrorTranslator;
