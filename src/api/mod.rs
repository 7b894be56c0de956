//! Transport for the remote content API: one attempt per call, no retry, no
//! timeout, success decided by the HTTP status.
use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode, Url};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::section::Section;

use self::model::{ErrorBody, RequestBody};

pub mod model;

pub const DEFAULT_API_BASE: &str = "https://nurse-back.onrender.com/";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server returned {status}: {}", .message.as_deref().unwrap_or("Unknown error"))]
    Server {
        status: StatusCode,
        message: Option<String>,
    },
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Network(err.to_string())
    }
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Server { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    /// Text shown to the operator after a failed action.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Network(_) => "Network error.".to_string(),
            ApiError::Server { message, .. } => message
                .clone()
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| "Unknown error".to_string()),
            ApiError::Decode(_) => "Unexpected response from server.".to_string(),
            ApiError::Endpoint(detail) => format!("Invalid endpoint: {detail}"),
        }
    }
}

/// The content API as seen by the admin panel and the public pages.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// `GET /{section}`; the raw body, still wrapped under its alias key.
    async fn list(&self, section: Section) -> Result<Value, ApiError>;

    /// `GET /{section}/{id}`.
    async fn fetch(&self, section: Section, id: &str) -> Result<Value, ApiError>;

    /// `POST /{section}/upload`, or `POST /address` for the address section.
    async fn create(&self, section: Section, body: RequestBody) -> Result<Value, ApiError>;

    /// `PUT /{section}/{id}`.
    async fn update(&self, section: Section, id: &str, body: RequestBody)
        -> Result<Value, ApiError>;

    /// `DELETE /{section}/{id}`.
    async fn delete(&self, section: Section, id: &str) -> Result<Value, ApiError>;
}

#[derive(Clone)]
pub struct ContentClient {
    http: Client,
    base_url: Url,
}

impl fmt::Debug for ContentClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ContentClient {
    pub fn new(base_url: Url, user_agent: &str) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(user_agent).build()?;
        Ok(Self { http, base_url })
    }

    pub fn from_config(cfg: &Config) -> Result<Self, ApiError> {
        let base_url = Url::parse(cfg.api.base_url.trim())
            .map_err(|err| ApiError::Endpoint(format!("{}: {err}", cfg.api.base_url)))?;
        Self::new(base_url, &cfg.api.user_agent)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Append escaped path segments to the base URL, whatever its trailing
    /// slash.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::Endpoint(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn build_request(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<RequestBody>,
    ) -> Result<reqwest::Request, ApiError> {
        let url = self.endpoint(segments)?;
        let builder = self.http.request(method, url);
        let builder = match body {
            None => builder,
            Some(RequestBody::Json(value)) => builder.json(&value),
            Some(RequestBody::Multipart(form)) => builder.multipart(form.into_multipart()?),
        };
        Ok(builder.build()?)
    }

    async fn execute(&self, request: reqwest::Request) -> Result<Value, ApiError> {
        let method = request.method().clone();
        let url = request.url().clone();
        debug!(%method, %url, "content api request");

        let res = self.http.execute(request).await?;
        let status = res.status();
        let text = res.text().await?;
        debug!(%method, %url, %status, "content api response");

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.error);
            if status != StatusCode::NOT_FOUND {
                warn!(%method, %url, %status, body = %text, "content api error");
            }
            return Err(ApiError::Server { status, message });
        }
        if text.trim().is_empty() {
            return Ok(Value::Object(Map::new()));
        }
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl ContentService for ContentClient {
    async fn list(&self, section: Section) -> Result<Value, ApiError> {
        let request = self.build_request(Method::GET, &[section.key()], None)?;
        self.execute(request).await
    }

    async fn fetch(&self, section: Section, id: &str) -> Result<Value, ApiError> {
        let request = self.build_request(Method::GET, &[section.key(), id], None)?;
        self.execute(request).await
    }

    async fn create(&self, section: Section, body: RequestBody) -> Result<Value, ApiError> {
        let request = self.build_request(Method::POST, &section.create_path(), Some(body))?;
        self.execute(request).await
    }

    async fn update(
        &self,
        section: Section,
        id: &str,
        body: RequestBody,
    ) -> Result<Value, ApiError> {
        let request = self.build_request(Method::PUT, &[section.key(), id], Some(body))?;
        self.execute(request).await
    }

    async fn delete(&self, section: Section, id: &str) -> Result<Value, ApiError> {
        let request = self.build_request(Method::DELETE, &[section.key(), id], None)?;
        self.execute(request).await
    }
}
