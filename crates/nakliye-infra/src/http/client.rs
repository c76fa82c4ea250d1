use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use nakliye_types::{BearerToken, Error, Result};

/// HTTP client for the external backend
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Serialize)]
struct SignInRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct SignInResponse {
    access_token: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Exchange credentials for a bearer token
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<BearerToken> {
        let response = self
            .http
            .post(self.url("/auth/signin"))
            .json(&SignInRequest { email, password })
            .send()
            .await
            .map_err(network)?;
        let response = check_status(response).await?;
        let body: SignInResponse = response.json().await.map_err(network)?;
        BearerToken::new(body.access_token).ok_or(Error::MissingCredential)
    }

    /// Send an authorized request and return the JSON body, if any
    pub async fn forward(
        &self,
        method: Method,
        path: &str,
        token: &BearerToken,
        body: Option<&Value>,
    ) -> Result<Option<Value>> {
        debug!(%method, path, "backend request");
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(AUTHORIZATION, token.header_value());
        if let Some(body) = body {
            request = request.json(body);
        }
        let response = request.send().await.map_err(network)?;
        let response = check_status(response).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = response.bytes().await.map_err(network)?;
        if bytes.is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Bind a token to this client
    pub fn session(&self, token: BearerToken) -> ApiSession {
        ApiSession {
            client: self.clone(),
            token,
        }
    }
}

/// Backend client carrying a bearer token; implements the repository traits
#[derive(Debug, Clone)]
pub struct ApiSession {
    client: BackendClient,
    token: BearerToken,
}

impl ApiSession {
    pub fn client(&self) -> &BackendClient {
        &self.client
    }

    pub(crate) async fn fetch<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(Method::GET, path, None).await
    }

    pub(crate) async fn write<B: Serialize, T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let body = serde_json::to_value(body)?;
        self.send(method, path, Some(&body)).await
    }

    pub(crate) async fn remove(&self, path: &str) -> Result<()> {
        self.client
            .forward(Method::DELETE, path, &self.token, None)
            .await
            .map(|_| ())
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T> {
        let value = self
            .client
            .forward(method, path, &self.token, body)
            .await?
            .ok_or_else(|| Error::Upstream {
                status: StatusCode::BAD_GATEWAY.as_u16(),
                message: format!("empty response from {}", path),
            })?;
        Ok(serde_json::from_value(value)?)
    }
}

fn network(err: reqwest::Error) -> Error {
    Error::Network(err.to_string())
}

async fn check_status(response: reqwest::Response) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await.unwrap_or_default();
    let message = upstream_message(&text).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    warn!(status = status.as_u16(), %message, "backend rejected request");
    Err(Error::Upstream {
        status: status.as_u16(),
        message,
    })
}

fn upstream_message(text: &str) -> Option<String> {
    if text.trim().is_empty() {
        return None;
    }
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        for key in ["message", "error"] {
            match value.get(key) {
                Some(Value::String(s)) => return Some(s.clone()),
                Some(Value::Array(items)) => {
                    let joined: Vec<_> = items.iter().filter_map(Value::as_str).collect();
                    if !joined.is_empty() {
                        return Some(joined.join(", "));
                    }
                }
                _ => {}
            }
        }
    }
    Some(text.chars().take(200).collect())
}
