//! # 입력값 검증(Validation) 서비스
//!
//! 요청 DTO가 구현하는 [`Validate`] 트레이트와, 규칙을 체이닝으로 모으는 [`Validator`]를 제공합니다.
//!
//! 검증 결과는 두 가지로 나뉩니다:
//! - `ValidationError::Invalid`: 값이 규칙을 어김 (위반 목록을 모두 모아서 반환)
//! - `ValidationError::UnexpectedType`: 규칙을 적용할 수 없는 타입의 값에 규칙이 걸림

use serde::Serialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// 필드 하나에 대한 규칙 위반
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Validation failed with {} error(s): [{}]", .0.len(), join(.0))]
    Invalid(Vec<Violation>),

    #[error("No validator for constraint '{constraint}' on field '{field}' of type '{found}'")]
    UnexpectedType {
        field: String,
        constraint: &'static str,
        found: &'static str,
    },
}

fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// 요청 DTO 검증
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// 검증 규칙 빌더
///
/// ```ignore
/// Validator::new()
///     .not_blank("name", &self.name)
///     .length("name", &self.name, 1, 20)
///     .finish()
/// ```
///
/// 위반은 끝까지 모두 모으지만, `UnexpectedType`이 한 번 발생하면 이후 규칙은 무시합니다.
#[derive(Debug, Default)]
pub struct Validator {
    violations: Vec<Violation>,
    unexpected: Option<ValidationError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(mut self, field: &str, ok: bool, message: impl FnOnce() -> String) -> Self {
        if self.unexpected.is_none() && !ok {
            self.violations.push(Violation {
                field: field.to_string(),
                message: message(),
            });
        }
        self
    }

    /// 공백만으로 이루어지지 않은 문자열이어야 합니다.
    pub fn not_blank(self, field: &str, value: &str) -> Self {
        self.check(field, !value.trim().is_empty(), || "must not be blank".to_string())
    }

    /// 문자 수가 `min..=max` 범위여야 합니다.
    pub fn length(self, field: &str, value: &str, min: usize, max: usize) -> Self {
        let len = value.chars().count();
        self.check(field, (min..=max).contains(&len), || {
            format!("length must be between {min} and {max}")
        })
    }

    /// 정수 값이 `min..=max` 범위여야 합니다.
    pub fn range(self, field: &str, value: i64, min: i64, max: i64) -> Self {
        self.check(field, (min..=max).contains(&value), || {
            format!("must be between {min} and {max}")
        })
    }

    /// JSON 값의 크기(문자열 길이, 배열/객체 원소 수)가 `min..=max` 범위여야 합니다.
    ///
    /// `null`은 검사하지 않습니다. 숫자나 불리언에는 크기가 없으므로 `UnexpectedType`이 됩니다.
    pub fn size(mut self, field: &str, value: &Value, min: usize, max: usize) -> Self {
        let size = match value {
            Value::Null => return self,
            Value::String(s) => s.chars().count(),
            Value::Array(items) => items.len(),
            Value::Object(map) => map.len(),
            Value::Bool(_) | Value::Number(_) => {
                if self.unexpected.is_none() {
                    self.unexpected = Some(ValidationError::UnexpectedType {
                        field: field.to_string(),
                        constraint: "size",
                        found: json_type_name(value),
                    });
                }
                return self;
            }
        };
        self.check(field, (min..=max).contains(&size), || {
            format!("size must be between {min} and {max}")
        })
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if let Some(unexpected) = self.unexpected {
            return Err(unexpected);
        }
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::Invalid(self.violations))
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn collects_every_violation() {
        let err = Validator::new()
            .not_blank("name", "  ")
            .length("name", "  ", 3, 10)
            .range("page", 0, 1, 100)
            .finish()
            .unwrap_err();

        let ValidationError::Invalid(violations) = &err else {
            panic!("expected violations, got {err:?}");
        };
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[2].to_string(), "page: must be between 1 and 100");
        assert!(err.to_string().starts_with("Validation failed with 3 error(s)"));
    }

    #[test]
    fn passes_when_all_rules_hold() {
        let result = Validator::new()
            .not_blank("name", "rust")
            .size("tags", &json!(["a", "b"]), 0, 5)
            .size("tags", &Value::Null, 1, 5)
            .finish();
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn size_on_number_is_unexpected_type() {
        let err = Validator::new()
            .not_blank("name", "")
            .size("tags", &json!(3), 0, 5)
            .finish()
            .unwrap_err();

        assert_eq!(
            err,
            ValidationError::UnexpectedType {
                field: "tags".to_string(),
                constraint: "size",
                found: "number",
            }
        );
    }
}
