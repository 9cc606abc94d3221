//! Subscription card panel.
//!
//! Renders whatever [`SubscriptionView::display`] decides:
//! - Error banner alone when the initial fetch failed
//! - Skeleton bars while the fetch is pending
//! - The plan card, with the notice or action for its outcome

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

use crate::outcome::{
    period_end_text, plan_description, DateZone, SubscriptionOutcome, PLAN_HEADING,
};
use crate::view::{Display, SubscriptionView};

/// Trigger label while no request is in flight.
pub const CANCEL_LABEL: &str = "Cancel Subscription";

/// Trigger label while a cancellation is in flight.
pub const CANCELING_LABEL: &str = "Canceling...";

/// Shown when the backend has no subscription on file.
pub const NO_SUBSCRIPTION_NOTICE: &str = "No subscription on file";

const SKELETON_WIDTHS: [u16; 4] = [24, 40, 32, 20];

/// A horizontal placeholder bar of `width` cells.
pub fn skeleton_bar(width: u16) -> Line<'static> {
    Line::from(Span::styled(
        "░".repeat(width as usize),
        Style::default().fg(Color::DarkGray),
    ))
}

/// Panel rendering the subscription view.
pub struct SubscriptionPanel<'a> {
    view: &'a SubscriptionView,
    zone: DateZone,
}

impl<'a> SubscriptionPanel<'a> {
    pub fn new(view: &'a SubscriptionView, zone: DateZone) -> Self {
        Self { view, zone }
    }

    fn outer_block() -> Block<'static> {
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::LightCyan))
            .title(Span::styled(
                " Subscription ",
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ))
    }

    fn render_banner(message: &str, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(vec![
            Span::styled(
                "✖ ",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::styled(message.to_string(), Style::default().fg(Color::Red)),
        ]))
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .title(Span::styled(
                    " Error ",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
        )
        .render(area, buf);
    }

    fn render_skeleton(area: Rect, buf: &mut Buffer) {
        let block = Self::outer_block();
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = Vec::new();
        for width in SKELETON_WIDTHS {
            lines.push(skeleton_bar(width.min(inner.width)));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines).render(inner, buf);
    }

    fn render_no_subscription(area: Rect, buf: &mut Buffer) {
        let block = Self::outer_block();
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(NO_SUBSCRIPTION_NOTICE)
            .style(Style::default().fg(Color::Gray))
            .render(inner, buf);
    }

    fn card_lines(&self, description: &str, outcome: &SubscriptionOutcome, loading: bool) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(Span::styled(
                PLAN_HEADING,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                description.to_string(),
                Style::default().fg(Color::Gray),
            )),
            Line::from(""),
        ];

        match outcome {
            SubscriptionOutcome::PendingCancellation { period_end } => {
                lines.push(Line::from(Span::styled(
                    format!(
                        "Your subscription will end on {}",
                        period_end_text(*period_end, &self.zone)
                    ),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )));
                lines.push(Line::from(Span::styled(
                    "You will continue to have access to all features until this date.",
                    Style::default().fg(Color::Yellow),
                )));
            }
            SubscriptionOutcome::Active => {
                let button = if loading {
                    Span::styled(
                        format!("[ {} ]", CANCELING_LABEL),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    Span::styled(
                        format!("[ {} ]", CANCEL_LABEL),
                        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                    )
                };
                let mut spans = vec![button];
                if !loading {
                    spans.push(Span::styled("  press x", Style::default().fg(Color::DarkGray)));
                }
                lines.push(Line::from(spans));
            }
            SubscriptionOutcome::Canceled => {
                lines.push(Line::from(Span::styled(
                    "Your subscription is canceled.",
                    Style::default().fg(Color::Gray),
                )));
                lines.push(Line::from(Span::styled(
                    "You can resubscribe at any time to restore access.",
                    Style::default().fg(Color::Gray),
                )));
            }
            SubscriptionOutcome::Other(status) => {
                lines.push(Line::from(vec![
                    Span::styled("Status: ", Style::default().fg(Color::Gray)),
                    Span::styled(status.clone(), Style::default().fg(Color::Cyan)),
                ]));
            }
        }

        lines
    }
}

impl Widget for SubscriptionPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.view.display() {
            Display::ErrorOnly(message) => {
                let height = 3.min(area.height);
                Self::render_banner(message, Rect { height, ..area }, buf);
            }
            Display::Skeleton => Self::render_skeleton(area, buf),
            Display::NoSubscription => Self::render_no_subscription(area, buf),
            Display::Card {
                subscription,
                outcome,
                banner,
                loading,
            } => {
                let card_area = match banner {
                    Some(message) => {
                        let chunks = Layout::default()
                            .direction(Direction::Vertical)
                            .constraints([Constraint::Length(3), Constraint::Min(0)])
                            .split(area);
                        Self::render_banner(message, chunks[0], buf);
                        chunks[1]
                    }
                    None => area,
                };

                let block = Self::outer_block();
                let inner = block.inner(card_area);
                block.render(card_area, buf);

                let lines = self.card_lines(plan_description(subscription), &outcome, loading);
                Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .render(inner, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toast::Notifications;
    use subdesk_client::{ClientError, Plan, Subscription, SubscriptionStatus};

    use chrono::FixedOffset;

    fn utc() -> DateZone {
        DateZone::Fixed(FixedOffset::east_opt(0).unwrap())
    }

    fn render(view: &SubscriptionView) -> String {
        let area = Rect::new(0, 0, 90, 16);
        let mut buf = Buffer::empty(area);
        SubscriptionPanel::new(view, utc()).render(area, &mut buf);

        let mut text = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                text.push_str(buf[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn loaded(sub: Subscription) -> SubscriptionView {
        let mut view = SubscriptionView::new();
        view.apply_fetch(Ok(Some(sub)), &mut Notifications::default());
        view
    }

    fn active() -> Subscription {
        Subscription {
            status: SubscriptionStatus::Active,
            plan: Some(Plan {
                description: Some("X".into()),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn test_skeleton_before_fetch() {
        let text = render(&SubscriptionView::new());
        assert!(text.contains("░░░░"));
        assert!(!text.contains(PLAN_HEADING));
    }

    #[test]
    fn test_fetch_error_renders_banner_only() {
        let mut view = SubscriptionView::new();
        view.apply_fetch(
            Err(ClientError::Decode("eof".into())),
            &mut Notifications::default(),
        );
        let text = render(&view);

        assert!(text.contains("Failed to load subscription details"));
        assert!(!text.contains("░"));
        assert!(!text.contains(PLAN_HEADING));
        assert!(!text.contains(CANCEL_LABEL));
    }

    #[test]
    fn test_active_card() {
        let text = render(&loaded(active()));
        assert!(text.contains(PLAN_HEADING));
        assert!(text.contains("X"));
        assert!(text.contains(CANCEL_LABEL));
        assert!(!text.contains(CANCELING_LABEL));
    }

    #[test]
    fn test_loading_label() {
        let mut view = loaded(active());
        view.request_cancel();
        view.resolve_confirm(true);

        let text = render(&view);
        assert!(text.contains(CANCELING_LABEL));
        assert!(!text.contains(CANCEL_LABEL));
    }

    #[test]
    fn test_pending_notice_with_date() {
        let text = render(&loaded(Subscription {
            status: SubscriptionStatus::Canceled,
            cancel_at_period_end: true,
            current_period_end: Some(1_700_000_000),
            plan: None,
        }));

        assert!(text.contains("Your subscription will end on November 14, 2023"));
        assert!(text.contains("You will continue to have access"));
        assert!(text.contains("Enterprise-grade features and support"));
        assert!(!text.contains(CANCEL_LABEL));
        assert!(!text.contains("Your subscription is canceled."));
    }

    #[test]
    fn test_canceled_card() {
        let text = render(&loaded(Subscription {
            status: SubscriptionStatus::Canceled,
            ..Default::default()
        }));

        assert!(text.contains("Your subscription is canceled."));
        assert!(text.contains("You can resubscribe at any time to restore access."));
        assert!(!text.contains(CANCEL_LABEL));
    }

    #[test]
    fn test_other_status_shows_label() {
        let text = render(&loaded(Subscription {
            status: SubscriptionStatus::Other("past_due".into()),
            ..Default::default()
        }));

        assert!(text.contains("Status: past_due"));
        assert!(!text.contains(CANCEL_LABEL));
    }

    #[test]
    fn test_cancel_error_banner_above_card() {
        let mut view = loaded(active());
        let mut toasts = Notifications::default();
        view.request_cancel();
        view.resolve_confirm(true);
        view.apply_cancel(
            Err(ClientError::Status {
                status: 402,
                message: Some("card declined".into()),
            }),
            &mut toasts,
        );

        let text = render(&view);
        let banner = text.find("card declined").unwrap();
        let heading = text.find(PLAN_HEADING).unwrap();
        assert!(banner < heading);
        assert!(text.contains(CANCEL_LABEL));
    }

    #[test]
    fn test_no_subscription_notice() {
        let mut view = SubscriptionView::new();
        view.apply_fetch(Ok(None), &mut Notifications::default());
        assert!(render(&view).contains(NO_SUBSCRIPTION_NOTICE));
    }
}
