//! HTTP client for the content API.
//!
//! The core hands finished payloads to this layer; nothing here retries or
//! repairs anything. Endpoints and credentials come from the environment
//! with production defaults, so batch runs need no interactive input.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Environment variable overriding the API base URL.
pub const ENV_BASE_URL: &str = "WEBUDDHIST_API_BASE_URL";
pub const ENV_EMAIL: &str = "WEBUDDHIST_EMAIL";
pub const ENV_PASSWORD: &str = "WEBUDDHIST_PASSWORD";

const DEFAULT_BASE_URL: &str = "https://api.webuddhist.com";
const SEGMENTS_ENDPOINT: &str = "/api/v1/segments";
const TOC_ENDPOINT: &str = "/api/v1/texts/table-of-content";
const MAPPINGS_ENDPOINT: &str = "/api/v1/mappings";
const AUTH_ENDPOINT: &str = "/api/v1/auth/login";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response; body kept verbatim for diagnosis.
    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },
}

/// API endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,

    /// Credentials, if present in the environment
    pub email: Option<String>,
    pub password: Option<String>,
}

impl ApiConfig {
    /// Read configuration from the environment, falling back to production
    /// defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var(ENV_BASE_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            email: std::env::var(ENV_EMAIL).ok(),
            password: std::env::var(ENV_PASSWORD).ok(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Full URL for an endpoint path.
    #[must_use]
    pub fn full_url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), endpoint)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            email: None,
            password: None,
        }
    }
}

#[derive(Deserialize)]
struct LoginResponse {
    auth: AuthTokens,
}

#[derive(Deserialize)]
struct AuthTokens {
    access_token: String,
}

/// Blocking client for the content API.
///
/// The pipeline is synchronous end to end, so uploads block too; callers
/// wanting concurrency run whole pipelines in parallel, never shared
/// clients mid-run.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::blocking::Client,
    config: ApiConfig,
}

impl ApiClient {
    /// # Errors
    ///
    /// Returns `ClientError::Http` if the underlying client cannot be built.
    pub fn new(config: ApiConfig) -> Result<Self, ClientError> {
        Ok(Self {
            http: reqwest::blocking::Client::builder().build()?,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Log in and return a bearer token.
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Api` on rejected credentials.
    pub fn login(&self, email: &str, password: &str) -> Result<String, ClientError> {
        let response = self
            .http
            .post(self.config.full_url(AUTH_ENDPOINT))
            .json(&serde_json::json!({ "email": email, "password": password }))
            .send()?;

        let response = check_status(response)?;
        let login: LoginResponse = response.json()?;
        info!("authenticated against {}", self.config.base_url);
        Ok(login.auth.access_token)
    }

    /// Upload a prepared segment payload.
    pub fn upload_segments(
        &self,
        payload: &serde_json::Value,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.post(SEGMENTS_ENDPOINT, payload, token)
    }

    /// Upload a resolved table of contents.
    pub fn upload_toc<T: Serialize>(
        &self,
        toc: &T,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.post(TOC_ENDPOINT, toc, token)
    }

    /// Upload a mapping payload.
    pub fn upload_mappings<T: Serialize>(
        &self,
        payload: &T,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        self.post(MAPPINGS_ENDPOINT, payload, token)
    }

    fn post<T: Serialize>(
        &self,
        endpoint: &str,
        payload: &T,
        token: &str,
    ) -> Result<serde_json::Value, ClientError> {
        let url = self.config.full_url(endpoint);
        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(payload)
            .send()?;

        let response = check_status(response)?;
        info!(%url, "payload uploaded");
        Ok(response.json()?)
    }
}

fn check_status(
    response: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ClientError::Api {
            status: status.as_u16(),
            body: response.text().unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_url_joins_cleanly() {
        let config = ApiConfig::default().with_base_url("https://example.com");
        assert_eq!(
            config.full_url("/api/v1/mappings"),
            "https://example.com/api/v1/mappings"
        );

        let trailing = ApiConfig::default().with_base_url("https://example.com/");
        assert_eq!(
            trailing.full_url("/api/v1/mappings"),
            "https://example.com/api/v1/mappings"
        );
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(ApiConfig::default().base_url, "https://api.webuddhist.com");
    }
}
