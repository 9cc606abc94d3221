//! Transient notifications ("toasts") for subdesk.
//!
//! Toasts surface the outcome of a network operation independently of the
//! view state: they stack in the top-right corner and expire on their own.
//!
//! ## Levels
//!
//! - **Success**: cancellation accepted by the backend
//! - **Error**: fetch or cancellation failed

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Maximum toasts kept at once; the oldest is dropped first.
pub const MAX_TOASTS: usize = 5;

/// Toast severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    /// Operation succeeded
    Success,
    /// Operation failed
    Error,
}

impl ToastLevel {
    /// Icon for this level.
    pub fn icon(&self) -> &'static str {
        match self {
            ToastLevel::Success => "✓",
            ToastLevel::Error => "✖",
        }
    }

    /// Accent color for this level.
    pub fn color(&self) -> Color {
        match self {
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        }
    }
}

/// A single notification.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Unique identifier
    pub id: u64,
    /// Severity
    pub level: ToastLevel,
    /// Text shown to the user
    pub message: String,
    /// When the toast was raised
    pub created_at: Instant,
}

impl Toast {
    /// Whether this toast has outlived `ttl` at `now`.
    pub fn is_expired(&self, now: Instant, ttl: Duration) -> bool {
        now.saturating_duration_since(self.created_at) >= ttl
    }

    /// Format for display in one line.
    pub fn format_compact(&self) -> String {
        format!("{} {}", self.level.icon(), self.message)
    }
}

/// Bounded, self-expiring toast queue.
#[derive(Debug, Clone)]
pub struct Notifications {
    toasts: VecDeque<Toast>,
    next_id: u64,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self::new(Duration::from_secs(5))
    }
}

impl Notifications {
    /// Create a queue whose toasts live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            toasts: VecDeque::with_capacity(MAX_TOASTS),
            next_id: 1,
            ttl,
        }
    }

    /// Raise a success toast.
    pub fn success(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Success, message)
    }

    /// Raise an error toast.
    pub fn error(&mut self, message: impl Into<String>) -> u64 {
        self.push(ToastLevel::Error, message)
    }

    /// Raise a toast.
    pub fn push(&mut self, level: ToastLevel, message: impl Into<String>) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        if self.toasts.len() == MAX_TOASTS {
            self.toasts.pop_front();
        }
        self.toasts.push_back(Toast {
            id,
            level,
            message: message.into(),
            created_at: Instant::now(),
        });
        id
    }

    /// Drop toasts expired at `now`. Returns true if anything was removed.
    pub fn prune(&mut self, now: Instant) -> bool {
        let before = self.toasts.len();
        let ttl = self.ttl;
        self.toasts.retain(|t| !t.is_expired(now, ttl));
        self.toasts.len() != before
    }

    /// Toasts oldest first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.toasts.iter()
    }

    /// Most recent toast.
    pub fn latest(&self) -> Option<&Toast> {
        self.toasts.back()
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

/// Widget stacking toasts newest-first, right-aligned in its area.
pub struct ToastStack<'a> {
    notifications: &'a Notifications,
    width: u16,
}

impl<'a> ToastStack<'a> {
    pub fn new(notifications: &'a Notifications) -> Self {
        Self {
            notifications,
            width: 44,
        }
    }

    /// Override the toast width.
    pub fn width(mut self, width: u16) -> Self {
        self.width = width;
        self
    }

    /// Rows needed to show every toast in an area `area_width` wide.
    pub fn height(&self, area_width: u16) -> u16 {
        let width = self.width.min(area_width);
        if width < 8 {
            return 0;
        }
        self.notifications
            .iter()
            .map(|toast| toast_height(toast, width))
            .sum()
    }
}

fn toast_height(toast: &Toast, width: u16) -> u16 {
    let inner_width = width.saturating_sub(4).max(1) as usize;
    let text_lines = toast.format_compact().chars().count().div_ceil(inner_width) as u16;
    text_lines.max(1) + 2
}

impl Widget for ToastStack<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = self.width.min(area.width);
        if width < 8 {
            return;
        }

        let x = area.x + area.width - width;
        let mut y = area.y;

        for toast in self.notifications.iter().rev() {
            let height = toast_height(toast, width);
            if y + height > area.y + area.height {
                break;
            }

            let rect = Rect::new(x, y, width, height);
            Clear.render(rect, buf);
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{} ", toast.level.icon()),
                    Style::default()
                        .fg(toast.level.color())
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(toast.message.clone()),
            ]))
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(toast.level.color())),
            )
            .render(rect, buf);

            y += height;
        }
    }
}
