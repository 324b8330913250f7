//! HTTP layer: client construction, auth headers, status mapping.
//!
//! This is the ONLY place for status code handling. The adapters never
//! interpret status codes.

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, USER_AGENT};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{JudgeError, JudgeResult, STATUS_BAD_GATEWAY};

pub(crate) const USER_AGENT_VALUE: &str = concat!("codegrade/", env!("CARGO_PKG_VERSION"));

/// Header carrying the API key for queued judges.
pub(crate) const API_KEY_HEADER: &str = "x-auth-token";

/// Longest remote error body we keep in an error message.
const MAX_ERROR_BODY: usize = 200;

/// How the credential is presented to the provider.
#[derive(Debug, Clone)]
pub(crate) enum Auth {
    None,
    Bearer(String),
    ApiKey(String),
}

impl Auth {
    pub(crate) fn bearer(key: Option<&str>) -> Self {
        key.map(|k| Self::Bearer(k.to_string())).unwrap_or(Self::None)
    }

    pub(crate) fn api_key(key: Option<&str>) -> Self {
        key.map(|k| Self::ApiKey(k.to_string())).unwrap_or(Self::None)
    }
}

/// HTTP backend shared by the adapters (holds reqwest client, base URL, auth).
#[derive(Debug, Clone)]
pub(crate) struct HttpBackend {
    client: reqwest::Client,
    pub(crate) base_url: String,
    auth: Auth,
}

impl HttpBackend {
    /// No request timeout on the client; the executor's call budget is the
    /// only deadline.
    pub(crate) fn new(base_url: &str, auth: Auth) -> JudgeResult<Self> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

        let client = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .map_err(|e| {
                JudgeError::service(
                    STATUS_BAD_GATEWAY,
                    format!("failed to create HTTP client: {}", e),
                )
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth,
        })
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// POST a JSON body and decode a JSON response; any non-2xx becomes
    /// `Service` with the remote status preserved.
    pub(crate) async fn post_json<B, T>(&self, url: &str, body: &B) -> JudgeResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let mut request = self.client.post(url).json(body);

        request = match &self.auth {
            Auth::None => request,
            Auth::Bearer(token) => request.header(AUTHORIZATION, format!("Bearer {}", token)),
            Auth::ApiKey(key) => request.header(API_KEY_HEADER, key.as_str()),
        };

        let response = request.send().await?;
        let status = response.status();
        debug!(url = %url, status = status.as_u16(), "execution service responded");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let excerpt: String = body.chars().take(MAX_ERROR_BODY).collect();
            warn!(
                url = %url,
                status = status.as_u16(),
                body = %excerpt,
                "execution service returned an error"
            );
            let message = if excerpt.is_empty() {
                format!("HTTP {}", status)
            } else {
                format!("HTTP {}: {}", status.as_u16(), excerpt)
            };
            return Err(JudgeError::service(status.as_u16(), message));
        }

        let text = response.text().await.map_err(|e| {
            JudgeError::service(
                STATUS_BAD_GATEWAY,
                format!("failed to read response body: {}", e),
            )
        })?;

        serde_json::from_str(&text).map_err(|e| {
            JudgeError::service(
                STATUS_BAD_GATEWAY,
                format!("invalid response from execution service: {}", e),
            )
        })
    }
}
