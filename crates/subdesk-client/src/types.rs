//! Wire types for the subscription endpoints.
//!
//! The backend owns these records; the client only decodes them. Decoding is
//! lenient: missing flags default to false, missing timestamps and plans to
//! `None`, and unknown status strings are kept verbatim.

use serde::{Deserialize, Serialize};

/// Subscription status as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum SubscriptionStatus {
    /// "active"
    Active,
    /// "canceled"
    Canceled,
    /// Any other non-empty status ("past_due", "trialing", ...)
    Other(String),
    /// Status missing or empty
    #[default]
    Unknown,
}

impl SubscriptionStatus {
    /// Wire representation.
    pub fn as_str(&self) -> &str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Canceled => "canceled",
            SubscriptionStatus::Other(s) => s,
            SubscriptionStatus::Unknown => "",
        }
    }
}

impl From<String> for SubscriptionStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "active" => SubscriptionStatus::Active,
            "canceled" => SubscriptionStatus::Canceled,
            "" => SubscriptionStatus::Unknown,
            _ => SubscriptionStatus::Other(value),
        }
    }
}

impl From<Option<String>> for SubscriptionStatus {
    fn from(value: Option<String>) -> Self {
        value.map(Self::from).unwrap_or_default()
    }
}

impl From<SubscriptionStatus> for String {
    fn from(value: SubscriptionStatus) -> Self {
        value.as_str().to_string()
    }
}

/// Plan attached to a subscription.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    /// Human-readable description of the plan tier
    #[serde(default)]
    pub description: Option<String>,
}

/// Snapshot of a subscription record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Lifecycle status
    #[serde(default)]
    pub status: SubscriptionStatus,

    /// Cancellation is scheduled for the end of the current period
    #[serde(default)]
    pub cancel_at_period_end: bool,

    /// End of the current period, seconds since the Unix epoch
    #[serde(default)]
    pub current_period_end: Option<i64>,

    /// Plan details
    #[serde(default)]
    pub plan: Option<Plan>,
}

impl Subscription {
    /// Plan description, if the backend sent one.
    pub fn plan_description(&self) -> Option<&str> {
        self.plan.as_ref().and_then(|p| p.description.as_deref())
    }
}

/// Body of `GET /api/subscription`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscriptionEnvelope {
    #[serde(default)]
    pub subscription: Option<Subscription>,
}

/// Body of a successful `POST /api/subscription/cancel`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CancelEnvelope {
    pub subscription: Subscription,
}

/// Optional body of a failed request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_full_record() {
        let sub: Subscription = serde_json::from_value(json!({
            "status": "active",
            "cancel_at_period_end": false,
            "current_period_end": 1_700_000_000,
            "plan": {"description": "Team plan"},
            "id": "sub_123"
        }))
        .unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Active);
        assert!(!sub.cancel_at_period_end);
        assert_eq!(sub.current_period_end, Some(1_700_000_000));
        assert_eq!(sub.plan_description(), Some("Team plan"));
    }

    #[test]
    fn test_decode_sparse_record() {
        let sub: Subscription = serde_json::from_value(json!({
            "cancel_at_period_end": true,
            "current_period_end": 1_700_000_000
        }))
        .unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Unknown);
        assert!(sub.cancel_at_period_end);
        assert_eq!(sub.plan_description(), None);
    }

    #[test]
    fn test_unknown_status_is_preserved() {
        let sub: Subscription = serde_json::from_value(json!({"status": "past_due"})).unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Other("past_due".into()));
        assert_eq!(sub.status.as_str(), "past_due");

        let encoded = serde_json::to_value(&sub).unwrap();
        assert_eq!(encoded["status"], "past_due");
    }

    #[test]
    fn test_null_plan_and_period_end() {
        let sub: Subscription = serde_json::from_value(json!({
            "status": "canceled",
            "current_period_end": null,
            "plan": null
        }))
        .unwrap();

        assert_eq!(sub.status, SubscriptionStatus::Canceled);
        assert_eq!(sub.current_period_end, None);
        assert!(sub.plan.is_none());

        let null_status: Subscription = serde_json::from_value(json!({"status": null})).unwrap();
        assert_eq!(null_status.status, SubscriptionStatus::Unknown);
    }

    #[test]
    fn test_envelope_with_null_subscription() {
        let env: SubscriptionEnvelope =
            serde_json::from_value(json!({"subscription": null})).unwrap();
        assert!(env.subscription.is_none());
    }

    #[test]
    fn test_error_body_without_error_field() {
        let body: ErrorBody = serde_json::from_value(json!({"detail": "nope"})).unwrap();
        assert!(body.error.is_none());
    }
}
