//! Terminal UI for subdesk.
//!
//! This crate provides the Ratatui-based subscription view.
//!
//! ## Features
//!
//! - Subscription card with plan details and status notices
//! - Confirmed cancellation with in-flight feedback
//! - Toast notifications for backend outcomes
//!
//! ## Hotkeys
//!
//! - `x` / `Enter` - Cancel subscription
//! - `y` / `n` - Answer the confirmation prompt
//! - `?` - Help
//! - `q` - Quit

pub mod app;
pub mod confirm;
pub mod event;
pub mod outcome;
pub mod subscription_panel;
pub mod toast;
pub mod view;

pub use app::{App, AppResult};
pub use outcome::SubscriptionOutcome;
pub use toast::{Notifications, Toast, ToastLevel};
pub use view::{Display, ErrorOrigin, Phase, SubscriptionView, ViewCommand, ViewError, ViewState};
