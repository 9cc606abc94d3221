//! reqwest-backed implementation of [`SubscriptionApi`].
//!
//! ## Example
//!
//! ```no_run
//! use subdesk_client::{HttpSubscriptionClient, SubscriptionApi};
//! use subdesk_core::ApiConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = HttpSubscriptionClient::from_config(&ApiConfig::default())?;
//! if let Some(sub) = client.fetch_subscription().await? {
//!     println!("status: {}", sub.status.as_str());
//! }
//! # Ok(())
//! # }
//! ```

use ::async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, COOKIE};
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use subdesk_core::ApiConfig;
use tokio::time::Duration;
use tracing::{debug, warn};

use crate::api::SubscriptionApi;
use crate::error::{ClientError, Result};
use crate::types::{CancelEnvelope, ErrorBody, Subscription, SubscriptionEnvelope};

/// Path of the read endpoint.
pub const SUBSCRIPTION_PATH: &str = "/api/subscription";

/// Path of the cancel endpoint.
pub const CANCEL_PATH: &str = "/api/subscription/cancel";

/// HTTP client for the subscription backend.
pub struct HttpSubscriptionClient {
    client: reqwest::Client,
    base_url: String,
    session_cookie: Option<String>,
}

impl HttpSubscriptionClient {
    /// Create a client from config.
    ///
    /// When `session_cookie_env` is set, the named variable must exist; its
    /// value is sent as the `Cookie` header on every request.
    pub fn from_config(config: &ApiConfig) -> Result<Self> {
        let session_cookie = match &config.session_cookie_env {
            Some(var) => Some(std::env::var(var).map_err(|_| {
                ClientError::Config(format!("{var} environment variable not set"))
            })?),
            None => None,
        };

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session_cookie,
        })
    }

    /// Create a client for `base_url` with default settings.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self> {
        let config = ApiConfig {
            base_url: base_url.into(),
            ..ApiConfig::default()
        };
        Self::from_config(&config)
    }

    /// Attach a session cookie to every request.
    pub fn with_session_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.session_cookie = Some(cookie.into());
        self
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(&self, method: Method, path: &str) -> Result<Response> {
        let url = self.url(path);
        debug!(%method, %url, "sending request");

        let mut request = self
            .client
            .request(method, &url)
            .header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = &self.session_cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty());
        warn!(%url, status = status.as_u16(), ?message, "backend returned error status");

        Err(ClientError::Status {
            status: status.as_u16(),
            message,
        })
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

#[async_trait]
impl SubscriptionApi for HttpSubscriptionClient {
    async fn fetch_subscription(&self) -> Result<Option<Subscription>> {
        let response = self.send(Method::GET, SUBSCRIPTION_PATH).await?;
        let envelope: SubscriptionEnvelope = Self::decode(response).await?;
        Ok(envelope.subscription)
    }

    async fn cancel_subscription(&self) -> Result<Subscription> {
        let response = self.send(Method::POST, CANCEL_PATH).await?;
        let envelope: CancelEnvelope = Self::decode(response).await?;
        Ok(envelope.subscription)
    }

    fn name(&self) -> &str {
        "http"
    }
}
