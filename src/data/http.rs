use std::time::Duration;

use async_trait::async_trait;
use log::{debug, error};
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::base::{ApiError, ApiRequest, ApiResult, Method, Transport};

/// Fixed per-request timeout
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// reqwest-backed transport talking JSON to the content backend
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: Url,
}

impl HttpTransport {
    pub fn new(base_url: &Url) -> ApiResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url: normalize_base(base_url),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolves a request path against the base URL, keeping any base path
    /// prefix such as `/api`
    pub fn endpoint(&self, request: &ApiRequest) -> ApiResult<Url> {
        let mut url = self.base_url.join(request.path.trim_start_matches('/'))?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }
}

fn normalize_base(base_url: &Url) -> Url {
    let mut base = base_url.clone();
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base
}

fn to_reqwest(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Patch => reqwest::Method::PATCH,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
    }
}

fn log_status(status: StatusCode, url: &Url) {
    match status {
        StatusCode::UNAUTHORIZED => error!("Authentication failed for {}", url),
        StatusCode::NOT_FOUND => error!("Requested resource does not exist: {}", url),
        StatusCode::INTERNAL_SERVER_ERROR => error!("Internal server error from {}", url),
        other => error!("Server error {} from {}", other.as_u16(), url),
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> ApiResult<Value> {
        let url = self.endpoint(&request)?;
        debug!("--> {} {}", request.method, url);

        let mut builder = self.client.request(to_reqwest(request.method), url.clone());
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            error!("Request {} {} failed: {}", request.method, url, err);
            ApiError::from(err)
        })?;

        let status = response.status();
        debug!("<-- {} {}", status.as_u16(), url);
        let text = response.text().await?;

        if !status.is_success() {
            log_status(status, &url);
            return Err(match status {
                StatusCode::NOT_FOUND => ApiError::NotFound(request.path),
                _ => ApiError::Status {
                    status: status.as_u16(),
                    message: if text.trim().is_empty() {
                        status.canonical_reason().unwrap_or("request failed").to_string()
                    } else {
                        text
                    },
                },
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}
