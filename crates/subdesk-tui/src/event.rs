//! Event handling for the subdesk TUI.
//!
//! Converts keyboard input into [`AppEvent`]s. While a confirmation prompt is
//! open only its answer keys (and `Ctrl+C`) are recognized.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Application-level events that can trigger state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// Press the cancel trigger
    RequestCancel,
    /// Accept the open prompt
    Confirm,
    /// Decline the open prompt
    Decline,
    /// Toggle help overlay
    ToggleHelp,
    /// Close help overlay
    HideHelp,
    /// Request application quit
    Quit,
    /// Force quit (Ctrl+C)
    ForceQuit,
    /// No action needed
    None,
}

/// Input handler for converting key events to app events.
#[derive(Debug, Default)]
pub struct InputHandler {
    /// Whether a confirmation prompt is open
    confirm_mode: bool,
}

impl InputHandler {
    /// Create a new input handler.
    pub fn new() -> Self {
        Self { confirm_mode: false }
    }

    /// Set whether a confirmation prompt is open.
    pub fn set_confirm_mode(&mut self, active: bool) {
        self.confirm_mode = active;
    }

    /// Returns whether a confirmation prompt is open.
    pub fn is_confirm_mode(&self) -> bool {
        self.confirm_mode
    }

    /// Handle a key event and return the corresponding app event.
    pub fn handle_key(&mut self, key: KeyEvent) -> AppEvent {
        if key.kind == KeyEventKind::Release {
            return AppEvent::None;
        }

        // Ctrl+C always force quits
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return AppEvent::ForceQuit;
        }

        if self.confirm_mode {
            return self.handle_confirm_input(key);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => AppEvent::Quit,
            KeyCode::Char('?') => AppEvent::ToggleHelp,
            KeyCode::Esc => AppEvent::HideHelp,
            KeyCode::Char('x') | KeyCode::Char('X') | KeyCode::Enter => AppEvent::RequestCancel,
            _ => AppEvent::None,
        }
    }

    /// Handle input while a prompt is open.
    fn handle_confirm_input(&mut self, key: KeyEvent) -> AppEvent {
        let event = match key.code {
            // Enter opens the prompt, so it never answers it
            KeyCode::Char('y') | KeyCode::Char('Y') => AppEvent::Confirm,
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => AppEvent::Decline,
            _ => return AppEvent::None,
        };
        self.confirm_mode = false;
        event
    }
}
