//! Blocking yes/no prompt.
//!
//! While a prompt is open the input handler routes every key to it, so the
//! rest of the view cannot be driven until the user answers.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

/// Consequence text shown before a cancellation is submitted.
pub const CANCEL_CONFIRMATION: &str = "Are you sure you want to cancel your subscription? \
You will still have access until the end of your current billing period.";

/// An open confirmation prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmPrompt {
    title: String,
    message: String,
}

impl ConfirmPrompt {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Prompt guarding subscription cancellation.
    pub fn cancel_subscription() -> Self {
        Self::new("Cancel Subscription", CANCEL_CONFIRMATION)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Centered modal rendering of a [`ConfirmPrompt`].
pub struct ConfirmDialog<'a> {
    prompt: &'a ConfirmPrompt,
}

impl<'a> ConfirmDialog<'a> {
    pub fn new(prompt: &'a ConfirmPrompt) -> Self {
        Self { prompt }
    }

    /// Area the dialog occupies inside `area`.
    pub fn area(area: Rect) -> Rect {
        let width = 60.min(area.width.saturating_sub(4));
        let height = 9.min(area.height.saturating_sub(2));
        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        Rect::new(x, y, width, height)
    }
}

impl Widget for ConfirmDialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let dialog_area = Self::area(area);
        if dialog_area.width == 0 || dialog_area.height == 0 {
            return;
        }

        Clear.render(dialog_area, buf);

        let key_style = Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD);
        let lines = vec![
            Line::from(self.prompt.message.clone()),
            Line::from(""),
            Line::from(vec![
                Span::styled("[y]", key_style),
                Span::raw(" Yes   "),
                Span::styled("[n]", key_style),
                Span::raw(" No"),
            ])
            .alignment(Alignment::Center),
        ];

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Yellow))
                    .title(Span::styled(
                        format!(" {} ", self.prompt.title),
                        Style::default()
                            .fg(Color::Yellow)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(Color::Black)),
            )
            .render(dialog_area, buf);
    }
}
