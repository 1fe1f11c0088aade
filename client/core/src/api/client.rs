//! HTTP client for the admin REST API

use crate::config::AdminConfig;
use crate::error::{AdminError, ApiError, ErrorKind};
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use url::Url;

/// Pagination block of a list response
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub current_page: u32,
    pub page_size: u32,
    pub total_pages: u32,
    pub total_records: u64,
}

/// Decoded response envelope: `{ status, data, message, pagination }`
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    pub data: Value,
    pub message: Option<String>,
    pub pagination: Option<Pagination>,
}

impl Envelope {
    fn from_body(body: Value) -> Result<Self, ApiError> {
        match body {
            Value::Object(mut map) if map.contains_key("data") => {
                let pagination = match map.remove("pagination") {
                    Some(Value::Null) | None => None,
                    Some(p) => Some(serde_json::from_value(p).map_err(|e| {
                        ApiError::new(ErrorKind::Unknown, format!("invalid pagination: {}", e))
                    })?),
                };
                let message = map
                    .remove("message")
                    .and_then(|m| m.as_str().map(String::from));
                Ok(Self {
                    data: map.remove("data").unwrap_or(Value::Null),
                    message,
                    pagination,
                })
            }
            // Some endpoints answer with the bare payload
            other => Ok(Self { data: other, ..Default::default() }),
        }
    }

    pub fn into_data<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        serde_json::from_value(self.data)
            .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("unexpected response: {}", e)))
    }
}

/// API client
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    token: Option<String>,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Result<Self, AdminError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| AdminError::Config(format!("invalid api_url {:?}: {}", base_url, e)))?;
        Ok(Self {
            base_url,
            token: token.map(String::from),
            client: reqwest::Client::new(),
        })
    }

    pub fn from_config(config: &AdminConfig) -> Result<Self, AdminError> {
        Self::new(&config.api_url, config.api_token.as_deref())
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    pub async fn get_envelope(
        &self,
        path: &str,
        query: &[(String, String)],
    ) -> Result<Envelope, ApiError> {
        let req = self.request(Method::GET, path).query(query);
        self.send(req).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.get_envelope(path, &[]).await?.into_data()
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::POST, path).json(body);
        self.send(req).await?.into_data()
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let req = self.request(Method::PUT, path).json(body);
        self.send(req).await?.into_data()
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let req = self.request(Method::DELETE, path);
        self.send(req).await.map(|_| ())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url(), path);
        let mut req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }
        req
    }

    async fn send(&self, req: RequestBuilder) -> Result<Envelope, ApiError> {
        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            let message = error_message(&text).unwrap_or_else(|| {
                status.canonical_reason().unwrap_or("request failed").to_string()
            });
            tracing::debug!(status = status.as_u16(), %message, "api request failed");
            return Err(ApiError::from_status(status.as_u16(), message));
        }

        if text.trim().is_empty() {
            return Ok(Envelope::default());
        }
        let body: Value = serde_json::from_str(&text)
            .map_err(|e| ApiError::new(ErrorKind::Unknown, format!("invalid JSON: {}", e)))?;
        Envelope::from_body(body)
    }
}

/// Pull a human readable message out of an error body
fn error_message(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(body) => ["message", "error"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(String::from),
        Err(_) => Some(trimmed.to_string()),
    }
}
