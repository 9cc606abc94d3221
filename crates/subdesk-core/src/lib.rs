//! # subdesk-core
//!
//! Shared plumbing for the subdesk workspace.
//!
//! This crate provides:
//! - [`SubdeskError`] - Error type for configuration, filesystem and startup failures
//! - [`logging`] - Tracing setup writing JSON lines under `~/.subdesk/logs/`
//! - [`config`] - YAML configuration loaded from `~/.subdesk/config.yaml`
//!
//! ## Example
//!
//! ```no_run
//! use subdesk_core::{logging, SubdeskConfig};
//!
//! fn main() -> subdesk_core::Result<()> {
//!     let _guard = logging::init_logging(None, false)?;
//!     let config = SubdeskConfig::load(None)?;
//!     tracing::info!(base_url = %config.api.base_url, "configured");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod logging;

pub use config::{ApiConfig, SubdeskConfig, UiConfig};
pub use error::{Result, SubdeskError};
pub use logging::{init_logging, LogGuard};
