//! # subdesk-client
//!
//! Client for the two subscription endpoints the view depends on.
//!
//! This crate provides:
//! - [`SubscriptionApi`] - Trait the view calls through
//! - [`HttpSubscriptionClient`] - reqwest implementation
//! - [`MockSubscriptionApi`] - Scripted implementation for tests
//! - [`Subscription`] and the request envelopes
//!
//! ## Endpoints
//!
//! - `GET /api/subscription` → `{ "subscription": Subscription | null }`
//! - `POST /api/subscription/cancel` → `{ "subscription": Subscription }`,
//!   failures may carry `{ "error": string }`

pub mod api;
pub mod error;
pub mod http;
pub mod types;

pub use api::{MockFailure, MockSubscriptionApi, SubscriptionApi};
pub use error::{ClientError, Result};
pub use http::HttpSubscriptionClient;
pub use types::{Plan, Subscription, SubscriptionStatus};
