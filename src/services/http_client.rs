//! # 외부 HTTP 호출 로깅 클라이언트
//!
//! `reqwest::Client`를 감싸서 요청/응답을 debug 레벨로 로그에 남깁니다.
//!
//! 응답 본문 로깅은 `buffer_responses` 플래그로 결정합니다.
//! - `true`: 텍스트 본문(`text/*`, `*/json`, `*/xml`)을 한 번 메모리에 읽어 로그에 남기고,
//!   호출한 쪽에는 버퍼링된 응답(`ClientResponse::Buffered`)을 돌려줍니다.
//! - `false`: 본문은 건드리지 않고 Content-Length / Content-Type만 남깁니다.
//!   이 경우 처음 한 번만 경고 로그를 남깁니다.
//!
//! debug 레벨이 꺼져 있으면 아무것도 하지 않고 원래 응답을 그대로 돌려줍니다.

use std::{
    collections::BTreeMap,
    fmt::Write as _,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use anyhow::Context;
use axum::body::Bytes;
use encoding_rs::{Encoding, UTF_8};
use reqwest::{
    header::{HeaderMap, CONTENT_TYPE},
    Method, Request, RequestBuilder, StatusCode, Url,
};
use serde::de::DeserializeOwned;
use tracing::Level;

use crate::{config::Config, error::AppError, services::media_type::MediaType};

/// 요청/응답 로깅 클라이언트. 복제해도 같은 커넥션 풀을 공유합니다.
#[derive(Debug, Clone)]
pub struct LoggingClient {
    inner: reqwest::Client,
    buffer_responses: bool,
    warned_unbuffered: Arc<AtomicBool>,
}

impl LoggingClient {
    pub fn new(inner: reqwest::Client, buffer_responses: bool) -> Self {
        tracing::info!(buffer_responses, "LoggingClient created");
        Self {
            inner,
            buffer_responses,
            warned_unbuffered: Arc::new(AtomicBool::new(false)),
        }
    }

    /// 설정의 타임아웃과 버퍼링 플래그로 만듭니다.
    pub fn from_config(config: &Config) -> Result<Self, reqwest::Error> {
        let inner = reqwest::Client::builder()
            .timeout(config.http_client_timeout)
            .build()?;
        Ok(Self::new(inner, config.http_client_buffer_responses))
    }

    pub fn buffers_responses(&self) -> bool {
        self.buffer_responses
    }

    pub fn request(&self, method: Method, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.inner.request(method, url)
    }

    pub fn get(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.inner.get(url)
    }

    pub fn post(&self, url: impl reqwest::IntoUrl) -> RequestBuilder {
        self.inner.post(url)
    }

    /// `RequestBuilder`를 완성해서 실행합니다.
    pub async fn send(&self, builder: RequestBuilder) -> Result<ClientResponse, reqwest::Error> {
        self.execute(builder.build()?).await
    }

    /// 요청을 실행하고 요청/응답 로그를 남깁니다.
    pub async fn execute(&self, request: Request) -> Result<ClientResponse, reqwest::Error> {
        // 구독자가 DEBUG를 받지 않으면 요청 요약을 만드는 비용도 들이지 않습니다.
        if !tracing::enabled!(Level::DEBUG) {
            return self.inner.execute(request).await.map(ClientResponse::Streaming);
        }

        let summary = RequestSummary::capture(&request);
        tracing::debug!("{}", summary.render());

        let response = self.inner.execute(request).await?;
        self.log_response(&summary, response).await
    }

    async fn log_response(
        &self,
        request: &RequestSummary,
        response: reqwest::Response,
    ) -> Result<ClientResponse, reqwest::Error> {
        let mut out = request.render();
        let status = response.status();
        let _ = write!(
            out,
            "\r\n<< response.status: {} {}",
            status.as_u16(),
            status.canonical_reason().unwrap_or("")
        );
        let headers = single_value_map(response.headers());
        if !headers.is_empty() {
            let _ = write!(out, "\r\n<< response.headers: {headers:?}");
        }

        let content_length = response.content_length();
        if content_length == Some(0) {
            tracing::debug!("{out}");
            return Ok(ClientResponse::Streaming(response));
        }

        let media_type = MediaType::from_header(response.headers().get(CONTENT_TYPE));
        let text = media_type.as_ref().is_some_and(MediaType::is_text);

        // reqwest::Response의 본문은 한 번만 읽을 수 있으므로,
        // 로그를 위해 읽었다면 읽은 바이트를 담은 응답으로 바꿔서 돌려줘야 합니다.
        if text && self.buffer_responses {
            let buffered = BufferedResponse {
                status,
                url: response.url().clone(),
                headers: response.headers().clone(),
                body: Bytes::new(),
            };
            let body = match response.bytes().await {
                Ok(body) => body,
                Err(err) => {
                    tracing::warn!(error = %err, "Failed to read response body for logging");
                    return Err(err);
                }
            };
            let (encoding, text) = decode_body(&body, media_type.as_ref());
            let _ = write!(out, "\r\n<< response.body ({}): {text}", encoding.name());
            tracing::debug!("{out}");
            return Ok(ClientResponse::Buffered(BufferedResponse { body, ..buffered }));
        }

        // swap(true)는 이전 값을 돌려주므로, false를 받은 첫 호출만 경고를 남깁니다.
        // 다른 데이터와 순서를 맞출 필요가 없는 단순 플래그라 Relaxed로 충분합니다.
        if text && !self.warned_unbuffered.swap(true, Ordering::Relaxed) {
            tracing::warn!("Response buffering is disabled; text response bodies will not be logged");
        }

        match content_length {
            Some(length) => {
                let _ = write!(out, "\r\n<< Content-Length: {length}");
            }
            None => out.push_str("\r\n<< Content-Length: UNKNOWN"),
        }
        match &media_type {
            Some(media_type) => {
                let _ = write!(out, "\r\n<< Content-Type: {media_type}");
            }
            None => out.push_str("\r\n<< Content-Type: [null]"),
        }
        tracing::debug!("{out}");
        Ok(ClientResponse::Streaming(response))
    }
}

/// 요청을 실행하기 전에 로그용으로 떠 둔 요청 정보
#[derive(Debug)]
struct RequestSummary {
    method: Method,
    url: Url,
    headers: BTreeMap<String, String>,
    body: Option<String>,
}

impl RequestSummary {
    fn capture(request: &Request) -> Self {
        let body = request
            .body()
            .and_then(|body| body.as_bytes())
            .filter(|bytes| !bytes.is_empty())
            .map(|bytes| {
                let media_type = MediaType::from_header(request.headers().get(CONTENT_TYPE));
                if media_type.as_ref().is_some_and(MediaType::is_text) {
                    decode_body(bytes, media_type.as_ref()).1
                } else {
                    "[BINARY]".to_string()
                }
            });

        Self {
            method: request.method().clone(),
            url: request.url().clone(),
            headers: single_value_map(request.headers()),
            body,
        }
    }

    fn render(&self) -> String {
        let mut out = format!("\r\n>> {} {}", self.method, self.url);
        if !self.headers.is_empty() {
            let _ = write!(out, "\r\n>> request.headers: {:?}", self.headers);
        }
        if let Some(body) = &self.body {
            let _ = write!(out, "\r\n>> request.body: {body}");
        }
        out
    }
}

/// 헤더 이름마다 첫 번째 값만 남긴 맵
fn single_value_map(headers: &HeaderMap) -> BTreeMap<String, String> {
    headers
        .keys()
        .filter_map(|name| {
            let value = headers.get(name)?;
            Some((
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            ))
        })
        .collect()
}

/// Content-Type의 charset으로 본문을 디코딩합니다.
///
/// charset이 없거나 `encoding_rs`가 모르는 이름이면 UTF-8로 읽습니다.
/// 디코딩할 수 없는 바이트는 U+FFFD로 바뀝니다 (로그용이므로 실패하지 않음).
fn decode_body(bytes: &[u8], media_type: Option<&MediaType>) -> (&'static Encoding, String) {
    let encoding = media_type
        .and_then(MediaType::charset)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    (encoding, text.into_owned())
}

/// 본문을 이미 메모리에 읽어 둔 응답
#[derive(Debug, Clone)]
pub struct BufferedResponse {
    status: StatusCode,
    url: Url,
    headers: HeaderMap,
    body: Bytes,
}

/// `LoggingClient`가 돌려주는 응답
#[derive(Debug)]
pub enum ClientResponse {
    /// 로깅을 위해 본문을 이미 읽어 둔 응답
    Buffered(BufferedResponse),
    /// 본문을 건드리지 않은 원래 응답
    Streaming(reqwest::Response),
}

impl ClientResponse {
    pub fn is_buffered(&self) -> bool {
        matches!(self, ClientResponse::Buffered(_))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ClientResponse::Buffered(buffered) => buffered.status,
            ClientResponse::Streaming(response) => response.status(),
        }
    }

    pub fn url(&self) -> &Url {
        match self {
            ClientResponse::Buffered(buffered) => &buffered.url,
            ClientResponse::Streaming(response) => response.url(),
        }
    }

    pub fn headers(&self) -> &HeaderMap {
        match self {
            ClientResponse::Buffered(buffered) => &buffered.headers,
            ClientResponse::Streaming(response) => response.headers(),
        }
    }

    pub async fn bytes(self) -> Result<Bytes, reqwest::Error> {
        match self {
            ClientResponse::Buffered(buffered) => Ok(buffered.body),
            ClientResponse::Streaming(response) => response.bytes().await,
        }
    }

    pub async fn text(self) -> Result<String, reqwest::Error> {
        match self {
            ClientResponse::Buffered(buffered) => {
                let media_type = MediaType::from_header(buffered.headers.get(CONTENT_TYPE));
                Ok(decode_body(&buffered.body, media_type.as_ref()).1)
            }
            ClientResponse::Streaming(response) => response.text().await,
        }
    }

    /// 본문을 JSON으로 해석합니다.
    /// 전송 실패는 `ResourceAccess`, 해석 실패는 `Internal`이 됩니다.
    pub async fn json<T: DeserializeOwned>(self) -> Result<T, AppError> {
        let url = self.url().clone();
        let bytes = self.bytes().await?;
        let value = serde_json::from_slice(&bytes)
            .with_context(|| format!("failed to decode response body from {url}"))?;
        Ok(value)
    }
}
