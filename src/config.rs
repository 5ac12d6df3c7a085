//! # 애플리케이션 설정(Configuration) 모듈
//!
//! 환경변수에서 서버 설정값을 읽어오는 모듈입니다.
//! `.env` 파일이나 시스템 환경변수에서 값을 가져옵니다.
//!
//! 설정 항목:
//! - `HOST`: 서버 바인딩 주소
//! - `PORT`: 서버 포트 번호
//! - `APP_PROFILES`: 실행 환경 프로필 목록 (쉼표 구분, 예: "local" 또는 "development,api")
//! - `HTTP_CLIENT_BUFFER_RESPONSES`: 외부 호출 응답 본문을 버퍼링해서 로그에 남길지 여부
//! - `HTTP_CLIENT_TIMEOUT_SECS`: 외부 호출 타임아웃(초)
//! - `DOWNSTREAM_BASE_URL`: `/downstream/*` 중계 대상 API 주소 (없으면 중계 비활성)

use std::{env, fmt, str::FromStr, time::Duration};

/// 실행 환경 종류
///
/// 선언 순서가 곧 우선순위입니다. 여러 프로필이 동시에 활성화되어 있으면
/// [`ActiveProfiles::active_profile`]은 가장 앞에 선언된 종류를 돌려줍니다.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileType {
    /// 로컬
    Local,
    /// 개발
    Development,
    /// 스테이지
    Stage,
    /// 운영
    Production,
}

impl ProfileType {
    /// 우선순위 순서대로 나열한 전체 목록
    pub const ALL: [ProfileType; 4] = [
        ProfileType::Local,
        ProfileType::Development,
        ProfileType::Stage,
        ProfileType::Production,
    ];

    /// 환경변수에 적는 프로필 이름 (소문자)
    pub fn as_str(self) -> &'static str {
        match self {
            ProfileType::Local => "local",
            ProfileType::Development => "development",
            ProfileType::Stage => "stage",
            ProfileType::Production => "production",
        }
    }
}

impl fmt::Display for ProfileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProfileType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ProfileType::ALL
            .into_iter()
            .find(|profile| profile.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown profile: {s}"))
    }
}

/// 활성화된 실행 환경 프로필 (Environment Classifier)
///
/// 서버 시작 시 한 번 만들어진 뒤로는 바뀌지 않습니다.
/// 에러 응답의 `debugMessage` 노출 여부를 이 값으로 결정합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActiveProfiles {
    /// 설정에 적힌 프로필 이름들 (소문자로 정규화, 알 수 없는 이름도 그대로 보존)
    profiles: Vec<String>,
    /// `ProfileType::ALL` 순서로 찾은 첫 번째 활성 프로필
    active: Option<ProfileType>,
}

impl ActiveProfiles {
    /// 프로필 이름 목록으로 생성합니다.
    pub fn new<I, S>(profiles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let profiles: Vec<String> = profiles
            .into_iter()
            .map(|name| name.as_ref().trim().to_ascii_lowercase())
            .filter(|name| !name.is_empty())
            .collect();

        let active = ProfileType::ALL
            .into_iter()
            .find(|profile| profiles.iter().any(|name| name == profile.as_str()));

        Self { profiles, active }
    }

    /// "local,api" 같은 쉼표 구분 문자열을 파싱합니다.
    pub fn parse(raw: &str) -> Self {
        Self::new(raw.split(','))
    }

    /// 설정된 프로필 이름 목록
    pub fn profiles(&self) -> &[String] {
        &self.profiles
    }

    /// 우선순위가 가장 높은 활성 프로필. 해당하는 프로필이 없으면 `None`.
    pub fn active_profile(&self) -> Option<ProfileType> {
        self.active
    }

    /// 주어진 프로필이 활성 목록에 포함되어 있는지 여부
    pub fn is(&self, profile: ProfileType) -> bool {
        self.profiles.iter().any(|name| name == profile.as_str())
    }

    pub fn is_local(&self) -> bool {
        self.is(ProfileType::Local)
    }

    pub fn is_development(&self) -> bool {
        self.is(ProfileType::Development)
    }

    pub fn is_stage(&self) -> bool {
        self.is(ProfileType::Stage)
    }

    pub fn is_production(&self) -> bool {
        self.is(ProfileType::Production)
    }

    /// 디버깅용 상세 메시지를 클라이언트에 내보내도 되는 환경인가? (로컬/개발)
    pub fn exposes_debug_detail(&self) -> bool {
        self.is_local() || self.is_development()
    }
}

/// 애플리케이션 전체 설정을 담는 구조체
///
/// 서버 시작 시 환경변수에서 한 번 읽어온 후,
/// 애플리케이션 전체에서 공유됩니다.
#[derive(Debug, Clone)]
pub struct Config {
    /// 서버가 바인딩할 호스트 주소 (기본값: "0.0.0.0")
    pub host: String,
    /// 서버 포트 번호 (기본값: 8080)
    pub port: u16,
    /// 실행 환경 프로필 (기본값: 없음 → 운영과 동일하게 디버그 정보 비노출)
    pub profiles: ActiveProfiles,
    /// 외부 호출 응답 본문을 버퍼링해서 로깅할지 여부 (기본값: true)
    pub http_client_buffer_responses: bool,
    /// 외부 호출 타임아웃 (기본값: 30초)
    pub http_client_timeout: Duration,
    /// 중계 대상 API 기본 URL (기본값: 없음)
    pub downstream_base_url: Option<String>,
}

impl Config {
    /// 환경변수에서 설정값을 읽어 Config 인스턴스를 생성합니다.
    ///
    /// 모든 항목에 기본값이 있으므로 실패하지 않습니다.
    /// 값이 있지만 해석할 수 없으면 경고 로그를 남기고 기본값을 사용합니다.
    pub fn from_env() -> Self {
        let profiles = ActiveProfiles::parse(&env::var("APP_PROFILES").unwrap_or_default());
        for name in profiles.profiles() {
            if name.parse::<ProfileType>().is_err() {
                tracing::warn!(profile = %name, "Unknown profile in APP_PROFILES");
            }
        }

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_or("PORT", 8080),
            profiles,
            http_client_buffer_responses: parse_or("HTTP_CLIENT_BUFFER_RESPONSES", true),
            http_client_timeout: Duration::from_secs(parse_or("HTTP_CLIENT_TIMEOUT_SECS", 30)),
            // 빈 문자열은 설정하지 않은 것으로 봅니다.
            downstream_base_url: env::var("DOWNSTREAM_BASE_URL")
                .ok()
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        }
    }
}

/// 환경변수를 `T`로 파싱합니다. 없으면 조용히, 잘못된 값이면 경고와 함께 기본값을 씁니다.
fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(key, value = %raw, "Invalid value, falling back to default");
            default
        }),
        Err(_) => default,
    }
}
