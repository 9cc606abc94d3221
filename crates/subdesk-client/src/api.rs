//! Backend abstraction for the subscription view.
//!
//! This module defines the [`SubscriptionApi`] trait the view talks to, with
//! two implementations:
//! - [`HttpSubscriptionClient`](crate::http::HttpSubscriptionClient) - reqwest against the real backend
//! - [`MockSubscriptionApi`] - scripted responses for tests and demos

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use ::async_trait::async_trait;

use crate::error::{ClientError, Result};
use crate::types::Subscription;

/// Operations the subscription view needs from its backend.
#[async_trait]
pub trait SubscriptionApi: Send + Sync {
    /// `GET /api/subscription`.
    ///
    /// `Ok(None)` means the backend answered successfully with
    /// `"subscription": null`.
    async fn fetch_subscription(&self) -> Result<Option<Subscription>>;

    /// `POST /api/subscription/cancel`.
    ///
    /// Returns the backend's post-cancellation snapshot, which is
    /// authoritative (it decides between immediate and period-end
    /// cancellation).
    async fn cancel_subscription(&self) -> Result<Subscription>;

    /// Implementation name for logging.
    fn name(&self) -> &str;
}

/// Scripted failure for [`MockSubscriptionApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockFailure {
    pub status: u16,
    pub message: Option<String>,
}

impl MockFailure {
    fn to_error(&self) -> ClientError {
        ClientError::Status {
            status: self.status,
            message: self.message.clone(),
        }
    }
}

/// Mock backend that returns predefined responses and counts calls.
#[derive(Debug)]
pub struct MockSubscriptionApi {
    fetch: std::result::Result<Option<Subscription>, MockFailure>,
    cancel: std::result::Result<Subscription, MockFailure>,
    delay: Duration,
    fetch_calls: AtomicUsize,
    cancel_calls: AtomicUsize,
}

impl MockSubscriptionApi {
    /// Backend with no subscription on file and a failing cancel endpoint.
    pub fn new() -> Self {
        Self {
            fetch: Ok(None),
            cancel: Err(MockFailure {
                status: 404,
                message: Some("No active subscription".to_string()),
            }),
            delay: Duration::ZERO,
            fetch_calls: AtomicUsize::new(0),
            cancel_calls: AtomicUsize::new(0),
        }
    }

    /// Serve this snapshot from the fetch endpoint.
    pub fn with_subscription(mut self, subscription: Subscription) -> Self {
        self.fetch = Ok(Some(subscription));
        self
    }

    /// Fail the fetch endpoint with this status.
    pub fn with_fetch_failure(mut self, status: u16) -> Self {
        self.fetch = Err(MockFailure {
            status,
            message: None,
        });
        self
    }

    /// Serve this snapshot from the cancel endpoint.
    pub fn with_cancel_result(mut self, subscription: Subscription) -> Self {
        self.cancel = Ok(subscription);
        self
    }

    /// Fail the cancel endpoint with this status and optional body message.
    pub fn with_cancel_failure(mut self, status: u16, message: Option<&str>) -> Self {
        self.cancel = Err(MockFailure {
            status,
            message: message.map(str::to_string),
        });
        self
    }

    /// Delay every response.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of fetch requests served.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Number of cancel requests served.
    pub fn cancel_calls(&self) -> usize {
        self.cancel_calls.load(Ordering::SeqCst)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

impl Default for MockSubscriptionApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubscriptionApi for MockSubscriptionApi {
    async fn fetch_subscription(&self) -> Result<Option<Subscription>> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.fetch.clone().map_err(|f| f.to_error())
    }

    async fn cancel_subscription(&self) -> Result<Subscription> {
        self.cancel_calls.fetch_add(1, Ordering::SeqCst);
        self.pause().await;
        self.cancel.clone().map_err(|f| f.to_error())
    }

    fn name(&self) -> &str {
        "mock"
    }
}
