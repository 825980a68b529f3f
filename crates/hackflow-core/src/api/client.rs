//! HTTP client for the HackFlow Authentication Service.
//!
//! All endpoints take and return JSON. Failed requests carry an error
//! envelope whose `msg` field is surfaced to the user when present.

use std::time::Duration;

use anyhow::Result;
use reqwest::{header, Client};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::models::{AuthSuccess, LoginRequest, RegisterRequest, ThirdPartyRequest, UserProfile};

use super::{AuthError, AuthService};

// ============================================================================
// Constants
// ============================================================================

/// Base URL used when neither config nor environment provide one
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";
const THIRD_PARTY_PATH: &str = "/auth/google";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// API client for the Authentication Service.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    /// Create a new API client for the given base URL
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize, T: DeserializeOwned>(&self, path: &str, body: &B) -> Result<T, AuthError> {
        let url = self.url(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            warn!(
                url = %url,
                status = status.as_u16(),
                body = %AuthError::truncate_body(&text),
                "Authentication request rejected"
            );
            return Err(AuthError::from_status(status, &text));
        }

        serde_json::from_str(&text).map_err(|e| {
            AuthError::InvalidResponse(format!("Failed to parse response from {}: {}", url, e))
        })
    }
}

impl AuthService for ApiClient {
    async fn login(&self, request: &LoginRequest) -> Result<AuthSuccess, AuthError> {
        self.post(LOGIN_PATH, request).await
    }

    async fn register(&self, request: &RegisterRequest) -> Result<UserProfile, AuthError> {
        self.post(REGISTER_PATH, request).await
    }

    async fn exchange_third_party(&self, request: &ThirdPartyRequest) -> Result<AuthSuccess, AuthError> {
        self.post(THIRD_PARTY_PATH, request).await
    }
}
