//! Classification of a subscription snapshot into what the view shows.
//!
//! The backend's flags can contradict each other (`status == "canceled"`
//! together with `cancel_at_period_end == true`). [`SubscriptionOutcome`]
//! resolves them with a fixed precedence:
//!
//! 1. `cancel_at_period_end` set, any status → [`SubscriptionOutcome::PendingCancellation`]
//! 2. `status == "active"` → [`SubscriptionOutcome::Active`]
//! 3. `status == "canceled"` → [`SubscriptionOutcome::Canceled`]
//! 4. anything else → [`SubscriptionOutcome::Other`]

use chrono::{DateTime, FixedOffset, Local};
use subdesk_client::{Subscription, SubscriptionStatus};

/// Heading shown on every loaded subscription card.
pub const PLAN_HEADING: &str = "Professional Plan";

/// Shown when the plan has no description.
pub const DEFAULT_PLAN_DESCRIPTION: &str = "Enterprise-grade features and support";

/// Stand-in for a pending cancellation without a period end.
pub const UNKNOWN_PERIOD_END: &str = "the end of the current billing period";

/// What a loaded subscription means for the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubscriptionOutcome {
    /// Active and not scheduled for cancellation; the cancel trigger is offered
    Active,
    /// Cancellation scheduled; access continues until `period_end`
    PendingCancellation {
        /// Seconds since the Unix epoch
        period_end: Option<i64>,
    },
    /// Already canceled
    Canceled,
    /// Any other status, shown verbatim
    Other(String),
}

impl SubscriptionOutcome {
    /// Classify a snapshot.
    pub fn from_subscription(subscription: &Subscription) -> Self {
        if subscription.cancel_at_period_end {
            return SubscriptionOutcome::PendingCancellation {
                period_end: subscription.current_period_end,
            };
        }

        match &subscription.status {
            SubscriptionStatus::Active => SubscriptionOutcome::Active,
            SubscriptionStatus::Canceled => SubscriptionOutcome::Canceled,
            SubscriptionStatus::Other(status) => SubscriptionOutcome::Other(status.clone()),
            SubscriptionStatus::Unknown => SubscriptionOutcome::Other("unknown".to_string()),
        }
    }

    /// Whether the cancel trigger belongs to this outcome.
    pub fn offers_cancel(&self) -> bool {
        matches!(self, SubscriptionOutcome::Active)
    }

    /// Short label for the header status.
    pub fn label(&self) -> &str {
        match self {
            SubscriptionOutcome::Active => "Active",
            SubscriptionOutcome::PendingCancellation { .. } => "Ending",
            SubscriptionOutcome::Canceled => "Canceled",
            SubscriptionOutcome::Other(status) => status,
        }
    }
}

/// Plan description or the default text.
pub fn plan_description(subscription: &Subscription) -> &str {
    subscription
        .plan_description()
        .filter(|d| !d.trim().is_empty())
        .unwrap_or(DEFAULT_PLAN_DESCRIPTION)
}

/// Zone used to display dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateZone {
    /// System zone, with the offset in effect at each timestamp
    Local,
    /// Fixed offset from UTC
    Fixed(FixedOffset),
}

impl DateZone {
    /// Configured offset in minutes, else the system zone.
    pub fn from_offset_minutes(minutes: Option<i32>) -> Self {
        minutes
            .and_then(|m| FixedOffset::east_opt(m * 60))
            .map_or(DateZone::Local, DateZone::Fixed)
    }
}

const LONG_DATE: &str = "%B %-d, %Y";

/// Format an epoch-seconds timestamp as a long-form date ("November 14, 2023").
///
/// Returns `None` when the timestamp is outside chrono's range.
pub fn format_long_date(timestamp: i64, zone: &DateZone) -> Option<String> {
    let utc = DateTime::from_timestamp(timestamp, 0)?;
    let date = match zone {
        DateZone::Local => utc.with_timezone(&Local).format(LONG_DATE),
        DateZone::Fixed(offset) => utc.with_timezone(offset).format(LONG_DATE),
    };
    Some(date.to_string())
}

/// Text for the pending-cancellation notice date.
pub fn period_end_text(period_end: Option<i64>, zone: &DateZone) -> String {
    period_end
        .and_then(|ts| format_long_date(ts, zone))
        .unwrap_or_else(|| UNKNOWN_PERIOD_END.to_string())
}
