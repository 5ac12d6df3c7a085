//! # Content-Type 해석
//!
//! 응답 정규화(JSON 호환 여부)와 외부 호출 로깅(텍스트 본문 여부, charset)에서 함께 씁니다.

use std::fmt;

use axum::http::HeaderValue;

/// `type/subtype; param=value` 형태의 미디어 타입. 이름은 모두 소문자로 정규화됩니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    main: String,
    subtype: String,
    params: Vec<(String, String)>,
}

impl MediaType {
    pub fn parse(raw: &str) -> Option<Self> {
        let mut pieces = raw.split(';');
        let (main, subtype) = pieces.next()?.trim().split_once('/')?;
        let (main, subtype) = (main.trim(), subtype.trim());
        if main.is_empty() || subtype.is_empty() {
            return None;
        }

        let params = pieces
            .filter_map(|param| {
                let (key, value) = param.split_once('=')?;
                Some((
                    key.trim().to_ascii_lowercase(),
                    value.trim().trim_matches('"').to_string(),
                ))
            })
            .collect();

        Some(Self {
            main: main.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
            params,
        })
    }

    /// Content-Type 헤더 값에서 읽습니다. 헤더가 없거나 해석할 수 없으면 `None`.
    pub fn from_header(value: Option<&HeaderValue>) -> Option<Self> {
        value.and_then(|v| v.to_str().ok()).and_then(Self::parse)
    }

    pub fn main_type(&self) -> &str {
        &self.main
    }

    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    /// `application/json`과 호환되는가?
    ///
    /// 와일드카드(`*/*`, `application/*`)와 `+json` 접미사(`application/problem+json`)도 호환으로 봅니다.
    pub fn is_json_compatible(&self) -> bool {
        let main_ok = self.main == "application" || self.main == "*";
        let sub_ok = self.subtype == "json" || self.subtype == "*" || self.subtype.ends_with("+json");
        main_ok && sub_ok
    }

    /// `text/*`, `*/json`, `*/xml`이면 로그에 텍스트로 남길 수 있는 본문입니다.
    pub fn is_text(&self) -> bool {
        self.main == "text" || self.subtype == "json" || self.subtype == "xml"
    }

    /// `charset` 파라미터. 없으면 `None`.
    pub fn charset(&self) -> Option<&str> {
        self.params
            .iter()
            .find(|(key, _)| key == "charset")
            .map(|(_, value)| value.as_str())
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.main, self.subtype)?;
        for (key, value) in &self.params {
            write!(f, ";{key}={value}")?;
        }
        Ok(())
    }
}
