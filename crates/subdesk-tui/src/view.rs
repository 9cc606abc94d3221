//! State machine behind the subscription view.
//!
//! A [`SubscriptionView`] lives for exactly one mount. It never talks to the
//! network itself: transitions that need the backend return a
//! [`ViewCommand`], and the caller feeds the result back through
//! [`SubscriptionView::apply_fetch`] or [`SubscriptionView::apply_cancel`].
//!
//! ```text
//! Initializing ──fetch ok──► Idle ──confirm──► Canceling ──ok/err──► Idle
//!      │
//!      └──fetch err──► Failed   (terminal until remount)
//! ```

use subdesk_client::{ClientError, Subscription};
use tracing::{debug, error, info, warn};

use crate::confirm::ConfirmPrompt;
use crate::outcome::SubscriptionOutcome;
use crate::toast::Notifications;

/// Message shown when the initial fetch fails.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to load subscription details";

/// Message shown when cancellation fails without a server-supplied reason.
pub const CANCEL_ERROR_MESSAGE: &str = "Failed to cancel subscription";

/// Toast raised when the backend accepts a cancellation.
pub const CANCEL_SUCCESS_MESSAGE: &str = "Subscription successfully cancelled";

/// Backend work requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewCommand {
    /// `GET /api/subscription`
    FetchSubscription,
    /// `POST /api/subscription/cancel`
    CancelSubscription,
}

/// Which operation produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorOrigin {
    /// Initial fetch; terminal for this mount
    Fetch,
    /// Cancellation; the user may retry
    Cancel,
}

/// User-facing error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewError {
    pub origin: ErrorOrigin,
    pub message: String,
}

/// Snapshot slot of the view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubscriptionSlot {
    /// Fetch not answered yet
    #[default]
    Unset,
    /// Backend answered with `"subscription": null`
    NoSubscription,
    /// Last-known snapshot
    Loaded(Subscription),
}

/// Local state owned by one view instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    /// Last-known snapshot
    pub subscription: SubscriptionSlot,
    /// A cancellation request is in flight
    pub loading: bool,
    /// Message to show the user
    pub error: Option<ViewError>,
}

/// Lifecycle phase derived from [`ViewState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Idle,
    Canceling,
    Failed,
}

/// What the renderer should draw, derived from [`ViewState`] alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Display<'a> {
    /// Fetch failed: the banner and nothing else
    ErrorOnly(&'a str),
    /// Fetch pending
    Skeleton,
    /// Backend has no subscription on file
    NoSubscription,
    /// Subscription card
    Card {
        subscription: &'a Subscription,
        outcome: SubscriptionOutcome,
        /// Recoverable cancel error shown above the card
        banner: Option<&'a str>,
        /// Trigger disabled while a cancellation is in flight
        loading: bool,
    },
}

/// The subscription view for one mount.
#[derive(Debug, Default)]
pub struct SubscriptionView {
    state: ViewState,
    mounted: bool,
    confirm: Option<ConfirmPrompt>,
}

impl SubscriptionView {
    /// Create an unmounted view with empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Open confirmation prompt, if any.
    pub fn confirm_prompt(&self) -> Option<&ConfirmPrompt> {
        self.confirm.as_ref()
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> Phase {
        match (&self.state.error, &self.state.subscription) {
            (Some(ViewError { origin: ErrorOrigin::Fetch, .. }), _) => Phase::Failed,
            (_, SubscriptionSlot::Unset) => Phase::Initializing,
            _ if self.state.loading => Phase::Canceling,
            _ => Phase::Idle,
        }
    }

    /// Run the mount effect. Returns the fetch command the first time only.
    pub fn mount(&mut self) -> Option<ViewCommand> {
        if self.mounted {
            return None;
        }
        self.mounted = true;
        debug!("subscription view mounted");
        Some(ViewCommand::FetchSubscription)
    }

    /// Apply the result of the initial fetch.
    pub fn apply_fetch(
        &mut self,
        result: Result<Option<Subscription>, ClientError>,
        notifications: &mut Notifications,
    ) {
        if self.phase() != Phase::Initializing {
            warn!(phase = ?self.phase(), "ignoring fetch result outside initialization");
            return;
        }

        match result {
            Ok(Some(subscription)) => {
                info!(status = subscription.status.as_str(), "subscription loaded");
                self.state.subscription = SubscriptionSlot::Loaded(subscription);
                self.state.error = None;
            }
            Ok(None) => {
                info!("backend has no subscription on file");
                self.state.subscription = SubscriptionSlot::NoSubscription;
                self.state.error = None;
            }
            Err(e) => {
                error!(
                    error = %e,
                    network = e.is_network_error(),
                    hint = %e.friendly_message(),
                    "error fetching subscription"
                );
                self.state.error = Some(ViewError {
                    origin: ErrorOrigin::Fetch,
                    message: FETCH_ERROR_MESSAGE.to_string(),
                });
                notifications.error(FETCH_ERROR_MESSAGE);
            }
        }
    }

    /// Whether the cancel trigger is shown and enabled.
    pub fn can_cancel(&self) -> bool {
        match self.display() {
            Display::Card {
                outcome, loading, ..
            } => outcome.offers_cancel() && !loading,
            _ => false,
        }
    }

    /// User pressed the cancel trigger. Opens the confirmation prompt.
    ///
    /// Returns false when the trigger is hidden, disabled, or a prompt is
    /// already open.
    pub fn request_cancel(&mut self) -> bool {
        if self.confirm.is_some() || !self.can_cancel() {
            return false;
        }
        self.confirm = Some(ConfirmPrompt::cancel_subscription());
        true
    }

    /// Answer the open prompt. Accepting starts the cancellation.
    pub fn resolve_confirm(&mut self, accepted: bool) -> Option<ViewCommand> {
        self.confirm.take()?;

        if !accepted {
            debug!("cancellation declined");
            return None;
        }
        if !self.can_cancel() {
            return None;
        }

        self.state.loading = true;
        self.state.error = None;
        info!("submitting cancellation");
        Some(ViewCommand::CancelSubscription)
    }

    /// Apply the result of a cancellation request.
    pub fn apply_cancel(
        &mut self,
        result: Result<Subscription, ClientError>,
        notifications: &mut Notifications,
    ) {
        if !self.state.loading {
            warn!("ignoring cancel result with no request in flight");
            return;
        }

        match result {
            Ok(subscription) => {
                info!(
                    status = subscription.status.as_str(),
                    cancel_at_period_end = subscription.cancel_at_period_end,
                    "cancellation accepted"
                );
                self.state.subscription = SubscriptionSlot::Loaded(subscription);
                notifications.success(CANCEL_SUCCESS_MESSAGE);
            }
            Err(e) => {
                error!(
                    error = %e,
                    network = e.is_network_error(),
                    hint = %e.friendly_message(),
                    "error canceling subscription"
                );
                let message = e
                    .server_message()
                    .unwrap_or(CANCEL_ERROR_MESSAGE)
                    .to_string();
                notifications.error(message.clone());
                self.state.error = Some(ViewError {
                    origin: ErrorOrigin::Cancel,
                    message,
                });
            }
        }

        self.state.loading = false;
    }

    /// Rendering decision for the current state.
    pub fn display(&self) -> Display<'_> {
        let error = self.state.error.as_ref();

        if let Some(ViewError {
            origin: ErrorOrigin::Fetch,
            message,
        }) = error
        {
            return Display::ErrorOnly(message);
        }

        match &self.state.subscription {
            SubscriptionSlot::Unset => match error {
                Some(e) => Display::ErrorOnly(&e.message),
                None => Display::Skeleton,
            },
            SubscriptionSlot::NoSubscription => match error {
                Some(e) => Display::ErrorOnly(&e.message),
                None => Display::NoSubscription,
            },
            SubscriptionSlot::Loaded(subscription) => Display::Card {
                subscription,
                outcome: SubscriptionOutcome::from_subscription(subscription),
                banner: error.map(|e| e.message.as_str()),
                loading: self.state.loading,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use subdesk_client::{Plan, SubscriptionStatus};

    fn active(description: &str) -> Subscription {
        Subscription {
            status: SubscriptionStatus::Active,
            cancel_at_period_end: false,
            current_period_end: Some(1_700_000_000),
            plan: Some(Plan {
                description: Some(description.to_string()),
            }),
        }
    }

    fn pending() -> Subscription {
        Subscription {
            cancel_at_period_end: true,
            current_period_end: Some(1_700_000_000),
            ..Default::default()
        }
    }

    fn status_error(status: u16, message: Option<&str>) -> ClientError {
        ClientError::Status {
            status,
            message: message.map(str::to_string),
        }
    }

    fn loaded_view(sub: Subscription) -> (SubscriptionView, Notifications) {
        let mut view = SubscriptionView::new();
        let mut toasts = Notifications::default();
        view.mount();
        view.apply_fetch(Ok(Some(sub)), &mut toasts);
        (view, toasts)
    }

    #[test]
    fn test_mount_fetches_once() {
        let mut view = SubscriptionView::new();
        assert_eq!(view.phase(), Phase::Initializing);
        assert_eq!(view.display(), Display::Skeleton);

        assert_eq!(view.mount(), Some(ViewCommand::FetchSubscription));
        assert_eq!(view.mount(), None);
    }

    #[test]
    fn test_successful_fetch_shows_card_with_enabled_trigger() {
        let (view, toasts) = loaded_view(active("X"));

        assert_eq!(view.phase(), Phase::Idle);
        assert!(!view.state().loading);
        assert!(view.can_cancel());
        assert!(toasts.is_empty());

        match view.display() {
            Display::Card {
                subscription,
                outcome,
                banner,
                loading,
            } => {
                assert_eq!(subscription.plan_description(), Some("X"));
                assert_eq!(outcome, SubscriptionOutcome::Active);
                assert_eq!(banner, None);
                assert!(!loading);
            }
            other => panic!("expected card, got {other:?}"),
        }
    }

    #[test]
    fn test_fetch_failure_is_terminal() {
        let mut view = SubscriptionView::new();
        let mut toasts = Notifications::default();
        view.mount();
        view.apply_fetch(Err(status_error(500, None)), &mut toasts);

        assert_eq!(view.phase(), Phase::Failed);
        assert_eq!(view.display(), Display::ErrorOnly(FETCH_ERROR_MESSAGE));
        assert_eq!(toasts.latest().unwrap().message, FETCH_ERROR_MESSAGE);
        assert!(!view.can_cancel());
        assert!(!view.request_cancel());

        // A late result cannot revive a failed mount.
        view.apply_fetch(Ok(Some(active("X"))), &mut toasts);
        assert_eq!(view.phase(), Phase::Failed);
        assert_eq!(view.display(), Display::ErrorOnly(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_fetch_failure_ignores_server_message() {
        let mut view = SubscriptionView::new();
        let mut toasts = Notifications::default();
        view.apply_fetch(Err(status_error(403, Some("forbidden"))), &mut toasts);

        assert_eq!(view.display(), Display::ErrorOnly(FETCH_ERROR_MESSAGE));
    }

    #[test]
    fn test_null_subscription() {
        let mut view = SubscriptionView::new();
        let mut toasts = Notifications::default();
        view.apply_fetch(Ok(None), &mut toasts);

        assert_eq!(view.phase(), Phase::Idle);
        assert_eq!(view.display(), Display::NoSubscription);
        assert!(!view.can_cancel());
    }

    #[test]
    fn test_declined_confirmation_changes_nothing() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        let before = view.state().clone();

        assert!(view.request_cancel());
        assert!(view.confirm_prompt().is_some());
        assert_eq!(view.resolve_confirm(false), None);

        assert!(view.confirm_prompt().is_none());
        assert_eq!(view.state(), &before);
        toasts.prune(std::time::Instant::now());
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_accepted_confirmation_starts_cancel() {
        let (mut view, _) = loaded_view(active("X"));

        assert!(view.request_cancel());
        assert!(!view.request_cancel(), "second prompt must not open");
        assert_eq!(view.resolve_confirm(true), Some(ViewCommand::CancelSubscription));

        assert!(view.state().loading);
        assert_eq!(view.phase(), Phase::Canceling);
        assert!(!view.can_cancel(), "trigger disabled while in flight");
        assert!(!view.request_cancel());
        assert!(matches!(view.display(), Display::Card { loading: true, .. }));
    }

    #[test]
    fn test_resolve_without_prompt_is_noop() {
        let (mut view, _) = loaded_view(active("X"));
        assert_eq!(view.resolve_confirm(true), None);
        assert!(!view.state().loading);
    }

    #[test]
    fn test_cancel_success_replaces_snapshot() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        view.request_cancel();
        view.resolve_confirm(true);

        view.apply_cancel(Ok(pending()), &mut toasts);

        assert!(!view.state().loading);
        assert_eq!(view.state().error, None);
        assert_eq!(view.state().subscription, SubscriptionSlot::Loaded(pending()));
        assert_eq!(toasts.latest().unwrap().message, CANCEL_SUCCESS_MESSAGE);
        assert!(!view.can_cancel());
        assert!(matches!(
            view.display(),
            Display::Card {
                outcome: SubscriptionOutcome::PendingCancellation {
                    period_end: Some(1_700_000_000)
                },
                ..
            }
        ));
    }

    #[test]
    fn test_cancel_failure_prefers_server_message() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        view.request_cancel();
        view.resolve_confirm(true);

        view.apply_cancel(Err(status_error(402, Some("card declined"))), &mut toasts);

        assert!(!view.state().loading);
        assert_eq!(view.phase(), Phase::Idle);
        assert_eq!(toasts.latest().unwrap().message, "card declined");
        assert!(view.can_cancel(), "user may retry");
        match view.display() {
            Display::Card { banner, subscription, .. } => {
                assert_eq!(banner, Some("card declined"));
                assert_eq!(subscription, &active("X"));
            }
            other => panic!("expected card, got {other:?}"),
        }
    }

    #[test]
    fn test_cancel_failure_falls_back_to_generic_message() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        view.request_cancel();
        view.resolve_confirm(true);

        view.apply_cancel(Err(ClientError::Decode("eof".into())), &mut toasts);

        assert_eq!(view.state().error.as_ref().unwrap().message, CANCEL_ERROR_MESSAGE);
        assert_eq!(toasts.latest().unwrap().message, CANCEL_ERROR_MESSAGE);
    }

    #[test]
    fn test_retry_clears_previous_cancel_error() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        view.request_cancel();
        view.resolve_confirm(true);
        view.apply_cancel(Err(status_error(500, None)), &mut toasts);
        assert!(view.state().error.is_some());

        view.request_cancel();
        view.resolve_confirm(true);
        assert_eq!(view.state().error, None);
        assert!(view.state().loading);
    }

    #[test]
    fn test_cancel_result_without_request_is_ignored() {
        let (mut view, mut toasts) = loaded_view(active("X"));
        view.apply_cancel(Ok(pending()), &mut toasts);

        assert_eq!(view.state().subscription, SubscriptionSlot::Loaded(active("X")));
        assert!(toasts.is_empty());
    }

    #[test]
    fn test_pending_precedence_over_canceled_status() {
        let contradictory = Subscription {
            status: SubscriptionStatus::Canceled,
            ..pending()
        };
        let (view, _) = loaded_view(contradictory);

        assert!(matches!(
            view.display(),
            Display::Card {
                outcome: SubscriptionOutcome::PendingCancellation { .. },
                ..
            }
        ));
        assert!(!view.can_cancel());
    }
}
