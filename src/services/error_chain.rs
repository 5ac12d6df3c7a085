//! # 에러 원인(cause) 체인 유틸
//!
//! `std::error::Error::source()`로 연결된 원인 체인을 따라가는 순수 함수들입니다.

use std::error::Error;

use crate::error::{ApiException, AppError};

/// 에러의 원인 체인을 따라가며 타입이 정확히 `T`인 첫 번째 원인을 찾습니다.
///
/// 에러 자신은 검사하지 않고, 바로 아래 원인부터 시작합니다.
/// 체인 중간에 같은 타입이 여러 번 나오면 가장 바깥쪽(먼저 만나는) 것을 돌려줍니다.
pub fn find_inner_cause<'a, T>(error: &'a (dyn Error + 'static)) -> Option<&'a T>
where
    T: Error + 'static,
{
    let mut current = error.source();
    while let Some(cause) = current {
        if let Some(found) = cause.downcast_ref::<T>() {
            return Some(found);
        }
        current = cause.source();
    }
    None
}

/// 에러 메시지에 원인 체인의 메시지를 모두 이어 붙입니다.
///
/// `"outer - io::Error: io failed - ..."` 형태로, 바깥쪽 원인부터 차례로 붙습니다.
pub fn message_including_causes(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut current = error.source();
    while let Some(cause) = current {
        message.push_str(" - ");
        message.push_str(kind_name(cause));
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

/// 로그/디버그 메시지에 쓰는 에러 타입의 짧은 이름
pub fn kind_name(error: &(dyn Error + 'static)) -> &'static str {
    macro_rules! probe {
        ($($ty:ty => $name:literal),* $(,)?) => {
            $(if error.is::<$ty>() { return $name; })*
        };
    }

    probe! {
        ApiException => "ApiException",
        AppError => "AppError",
        std::io::Error => "io::Error",
        serde_json::Error => "serde_json::Error",
        reqwest::Error => "reqwest::Error",
        std::num::ParseIntError => "ParseIntError",
        std::num::ParseFloatError => "ParseFloatError",
        std::str::Utf8Error => "Utf8Error",
        std::string::FromUtf8Error => "FromUtf8Error",
        std::net::AddrParseError => "AddrParseError",
    }
    "Error"
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{fmt, io};

    /// 원인을 하나 가질 수 있는 테스트용 에러
    #[derive(Debug)]
    struct Layer {
        message: &'static str,
        source: Option<Box<dyn Error + Send + Sync>>,
    }

    impl Layer {
        fn new(message: &'static str) -> Self {
            Self { message, source: None }
        }

        fn caused_by(mut self, source: impl Error + Send + Sync + 'static) -> Self {
            self.source = Some(Box::new(source));
            self
        }
    }

    impl fmt::Display for Layer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(self.message)
        }
    }

    impl Error for Layer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            self.source.as_deref().map(|e| e as &(dyn Error + 'static))
        }
    }

    #[test]
    fn message_includes_single_cause() {
        let err = Layer::new("outer").caused_by(io::Error::other("io failed"));
        assert_eq!(message_including_causes(&err), "outer - io::Error: io failed");
    }

    #[test]
    fn message_lists_causes_outermost_first() {
        let err = Layer::new("top")
            .caused_by(Layer::new("middle").caused_by(io::Error::other("disk gone")));
        assert_eq!(
            message_including_causes(&err),
            "top - Error: middle - io::Error: disk gone"
        );
    }

    #[test]
    fn message_without_cause_is_own_message() {
        assert_eq!(message_including_causes(&Layer::new("alone")), "alone");
    }

    #[test]
    fn find_inner_cause_skips_the_error_itself() {
        let err = Layer::new("e1");
        assert!(find_inner_cause::<Layer>(&err).is_none());
    }

    #[test]
    fn find_inner_cause_returns_first_match() {
        let err = Layer::new("e1").caused_by(Layer::new("e2").caused_by(Layer::new("e3")));
        let found = find_inner_cause::<Layer>(&err).expect("cause");
        assert_eq!(found.message, "e2");
    }

    #[test]
    fn find_inner_cause_walks_past_other_types() {
        let err = Layer::new("e1")
            .caused_by(Layer::new("e2").caused_by(io::Error::other("deep")));
        let found = find_inner_cause::<io::Error>(&err).expect("io cause");
        assert_eq!(found.to_string(), "deep");
        assert!(find_inner_cause::<serde_json::Error>(&err).is_none());
    }
}
