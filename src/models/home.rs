//! # 샘플 핸들러 모델
//!
//! - `HomeResponse`: `GET /` 응답
//! - `ItemResponse`: `GET /items/{id}` 응답
//! - `SearchQuery` / `SearchResponse`: `GET /search` 쿼리와 응답
//! - `EchoRequest`: `POST /echo` 요청 본문 (그대로 돌려줌)

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::services::validation::{Validate, ValidationError, Validator};

/// `GET /` 응답
///
/// `uuid`는 외부에서 받는 값이 아니라 생성할 때 자동으로 채워집니다.
#[derive(Debug, Clone, Serialize)]
pub struct HomeResponse {
    pub uuid: String,
    pub message: String,
}

impl HomeResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            uuid: Uuid::now_v7().to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ItemResponse {
    pub id: u64,
}

/// `GET /search?keyword=...&page=...`
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub keyword: String,
    pub page: Option<u32>,
}

impl Validate for SearchQuery {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut validator = Validator::new()
            .not_blank("keyword", &self.keyword)
            .length("keyword", &self.keyword, 2, 50);
        if let Some(page) = self.page {
            validator = validator.range("page", i64::from(page), 1, 100);
        }
        validator.finish()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub keyword: String,
    pub page: u32,
}

/// `POST /echo` 요청 본문
///
/// `tags`는 어떤 JSON 값이든 받지만, 크기 규칙(0~5개)은 문자열/배열/객체에만 적용됩니다.
/// 숫자를 보내면 검증기 타입 오류(F03422)가 됩니다.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EchoRequest {
    pub name: String,
    #[serde(default)]
    pub tags: Value,
}

impl Validate for EchoRequest {
    fn validate(&self) -> Result<(), ValidationError> {
        Validator::new()
            .not_blank("name", &self.name)
            .length("name", &self.name, 1, 20)
            .size("tags", &self.tags, 0, 5)
            .finish()
    }
}
