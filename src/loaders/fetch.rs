//! The HTTP seam.
//!
//! Loaders never talk to the network directly. They describe a request as
//! a `FetchRequest` and await a `Fetcher`, so tests can answer with canned
//! responses and production code goes through `ReqwestFetcher`.

use std::future::Future;

use serde::de::DeserializeOwned;

use crate::error::{DeckError, Result};

/// HTTP methods the loaders issue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// An outgoing request.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,
    pub method: Method,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl FetchRequest {
    /// A `GET` with no headers.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// A `POST` carrying `body`.
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: Method::Post,
            body: Some(body.into()),
            ..Self::default()
        }
    }

    /// Add a header. Later headers with the same name are sent too.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add every header in `headers`.
    #[must_use]
    pub fn with_headers<'a>(mut self, headers: impl IntoIterator<Item = &'a (String, String)>) -> Self {
        self.headers.extend(headers.into_iter().cloned());
        self
    }

    /// Value of the first header named `name` (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// A fully-read response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl FetchResponse {
    #[must_use]
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            status_text: String::new(),
            body: body.into(),
        }
    }

    #[must_use]
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// 2xx.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Decode the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_str(&self.body)?)
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.body
    }
}

/// Something that can perform HTTP requests.
pub trait Fetcher {
    fn fetch(&self, request: &FetchRequest) -> impl Future<Output = Result<FetchResponse>> + Send;
}

/// `Fetcher` backed by a shared `reqwest::Client`.
///
/// Relative URLs (proxy paths such as `/api/archidekt/...`) are joined onto
/// `origin` when one is set and rejected otherwise.
#[derive(Clone, Debug, Default)]
pub struct ReqwestFetcher {
    client: reqwest::Client,
    origin: Option<reqwest::Url>,
}

impl ReqwestFetcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing client (timeouts, proxies and pools are the caller's).
    #[must_use]
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client, origin: None }
    }

    /// Resolve relative request URLs against `origin`.
    pub fn with_origin(mut self, origin: &str) -> Result<Self> {
        let origin = reqwest::Url::parse(origin)
            .map_err(|e| DeckError::Config(format!("invalid origin {origin:?}: {e}")))?;
        self.origin = Some(origin);
        Ok(self)
    }

    fn absolute_url(&self, url: &str) -> Result<reqwest::Url> {
        if let Ok(absolute) = reqwest::Url::parse(url) {
            return Ok(absolute);
        }
        let origin = self
            .origin
            .as_ref()
            .ok_or_else(|| DeckError::Transport(format!("relative URL {url:?} without an origin")))?;
        origin
            .join(url)
            .map_err(|e| DeckError::Transport(format!("cannot resolve {url:?}: {e}")))
    }
}

impl Fetcher for ReqwestFetcher {
    fn fetch(&self, request: &FetchRequest) -> impl Future<Output = Result<FetchResponse>> + Send {
        let url = self.absolute_url(&request.url);
        let client = self.client.clone();
        let request = request.clone();

        async move {
            let url = url?;
            let mut builder = match request.method {
                Method::Get => client.get(url),
                Method::Post => client.post(url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await?;
            let status = response.status();
            let body = response.text().await?;

            Ok(FetchResponse {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body,
            })
        }
    }
}
