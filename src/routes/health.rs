//! # 헬스체크(Health Check) 핸들러
//!
//! ## 엔드포인트
//! - `GET /health` → `{ "status": 200, "code": "SUCCESS", ..., "data": { "status": "ok" } }`
//! - `GET /version` → `0.1.0` (text/plain, 공통 응답으로 감싸지지 않음)

use axum::Json;
use serde_json::{json, Value};

/// `GET /health` — 서버 상태를 확인합니다.
///
/// 반환 타입이 `Json<Value>`이므로 Content-Type이 application/json이 되고,
/// 공통 응답 미들웨어가 `data`로 감싸서 내보냅니다.
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok"
    }))
}

/// `GET /version` — 빌드된 크레이트 버전
///
/// `&'static str`은 text/plain으로 나가므로 그대로 전달됩니다.
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
