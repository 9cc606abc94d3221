//! Main application state and logic for the subdesk TUI.
//!
//! The `App` owns the subscription view, the toast queue and a tokio runtime.
//! Backend calls run on the runtime; their results come back over a channel
//! and are applied on the UI thread, so view state is only ever touched here.

use std::io;
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};
use subdesk_client::{ClientError, Subscription, SubscriptionApi};
use subdesk_core::SubdeskConfig;
use tokio::runtime::Runtime;
use tracing::{debug, info};

use crate::confirm::ConfirmDialog;
use crate::event::{AppEvent, InputHandler};
use crate::outcome::{DateZone, SubscriptionOutcome};
use crate::subscription_panel::SubscriptionPanel;
use crate::toast::{Notifications, ToastStack};
use crate::view::{Display, SubscriptionView, ViewCommand};

/// Result type for app operations.
pub type AppResult<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Completed backend call, posted from the runtime to the UI thread.
#[derive(Debug)]
enum ApiEvent {
    Fetched(Result<Option<Subscription>, ClientError>),
    Cancelled(Result<Subscription, ClientError>),
}

/// Main application state.
pub struct App {
    /// The subscription view for this mount
    view: SubscriptionView,
    /// Transient notifications
    notifications: Notifications,
    /// Input handler for key events
    input_handler: InputHandler,
    /// Backend the view talks to
    api: Arc<dyn SubscriptionApi>,
    /// Runtime running backend calls
    runtime: Runtime,
    api_tx: Sender<ApiEvent>,
    api_rx: Receiver<ApiEvent>,
    /// Zone used to display dates
    zone: DateZone,
    /// Event loop tick
    tick_rate: Duration,
    /// Backend URL shown in the header
    base_url: String,
    /// Whether the app should quit
    should_quit: bool,
    /// Whether to show the help overlay
    show_help: bool,
    /// Dirty flag - whether UI needs redraw
    dirty: bool,
}

impl App {
    /// Create a new app talking to `api`.
    pub fn new(config: &SubdeskConfig, api: Arc<dyn SubscriptionApi>) -> AppResult<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("subdesk-api")
            .enable_all()
            .build()?;
        let (api_tx, api_rx) = mpsc::channel();

        Ok(Self {
            view: SubscriptionView::new(),
            notifications: Notifications::new(Duration::from_secs(config.ui.toast_duration_secs)),
            input_handler: InputHandler::new(),
            api,
            runtime,
            api_tx,
            api_rx,
            zone: DateZone::from_offset_minutes(config.ui.utc_offset_minutes),
            tick_rate: Duration::from_millis(config.ui.tick_rate_ms),
            base_url: config.api.base_url.clone(),
            should_quit: false,
            show_help: false,
            dirty: true,
        })
    }

    /// The subscription view.
    pub fn view(&self) -> &SubscriptionView {
        &self.view
    }

    /// Active toasts.
    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Check if the app should quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Check if help overlay is shown.
    pub fn show_help(&self) -> bool {
        self.show_help
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Run the view's mount effect.
    pub fn mount(&mut self) {
        if let Some(command) = self.view.mount() {
            self.dispatch(command);
        }
    }

    /// Start the backend call a view transition asked for.
    fn dispatch(&mut self, command: ViewCommand) {
        let api = Arc::clone(&self.api);
        let tx = self.api_tx.clone();
        debug!(?command, backend = api.name(), "dispatching");

        match command {
            ViewCommand::FetchSubscription => {
                self.runtime.spawn(async move {
                    let result = api.fetch_subscription().await;
                    if tx.send(ApiEvent::Fetched(result)).is_err() {
                        debug!("view gone before fetch completed");
                    }
                });
            }
            ViewCommand::CancelSubscription => {
                self.runtime.spawn(async move {
                    let result = api.cancel_subscription().await;
                    if tx.send(ApiEvent::Cancelled(result)).is_err() {
                        debug!("view gone before cancel completed");
                    }
                });
            }
        }
        self.mark_dirty();
    }

    fn apply_api_event(&mut self, event: ApiEvent) {
        match event {
            ApiEvent::Fetched(result) => self.view.apply_fetch(result, &mut self.notifications),
            ApiEvent::Cancelled(result) => self.view.apply_cancel(result, &mut self.notifications),
        }
        self.mark_dirty();
    }

    /// Apply every completed backend call. Returns true if any was applied.
    pub fn drain_api_events(&mut self) -> bool {
        let mut applied = false;
        while let Ok(event) = self.api_rx.try_recv() {
            self.apply_api_event(event);
            applied = true;
        }
        applied
    }

    /// Block up to `timeout` for the next backend result and apply it.
    pub fn wait_for_api_event(&mut self, timeout: Duration) -> bool {
        match self.api_rx.recv_timeout(timeout) {
            Ok(event) => {
                self.apply_api_event(event);
                true
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => false,
        }
    }

    /// Handle a key event.
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let event = self.input_handler.handle_key(key);
        self.handle_app_event(event);
    }

    /// Handle an application event.
    pub fn handle_app_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::RequestCancel => {
                if self.view.request_cancel() {
                    self.show_help = false;
                    self.input_handler.set_confirm_mode(true);
                    self.mark_dirty();
                }
            }
            AppEvent::Confirm | AppEvent::Decline => {
                if let Some(command) = self.view.resolve_confirm(event == AppEvent::Confirm) {
                    self.dispatch(command);
                }
                self.mark_dirty();
            }
            AppEvent::ToggleHelp => {
                self.show_help = !self.show_help;
                self.mark_dirty();
            }
            AppEvent::HideHelp => {
                if self.show_help {
                    self.show_help = false;
                    self.mark_dirty();
                }
            }
            AppEvent::Quit | AppEvent::ForceQuit => {
                info!("quit requested");
                self.should_quit = true;
            }
            AppEvent::None => {}
        }
    }

    /// Run the main application loop.
    pub fn run(&mut self) -> AppResult<()> {
        // Setup terminal
        crossterm::terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        crossterm::execute!(stdout, crossterm::terminal::EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        self.mount();
        let result = self.run_loop(&mut terminal);

        // Restore terminal
        crossterm::terminal::disable_raw_mode()?;
        crossterm::execute!(
            terminal.backend_mut(),
            crossterm::terminal::LeaveAlternateScreen
        )?;
        terminal.show_cursor()?;

        result
    }

    /// The inner event loop.
    fn run_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> AppResult<()> {
        while !self.should_quit {
            self.drain_api_events();

            if self.notifications.prune(Instant::now()) {
                self.mark_dirty();
            }

            if self.take_dirty() {
                terminal.draw(|frame| self.draw(frame))?;
            }

            if event::poll(self.tick_rate)? {
                match event::read()? {
                    Event::Key(key) => self.handle_key_event(key),
                    Event::Resize(_, _) => self.mark_dirty(),
                    _ => {}
                }
            }
        }
        Ok(())
    }

    /// Draw the UI.
    pub fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let toasts = ToastStack::new(&self.notifications);
        let toast_rows = toasts.height(area.width);

        // Main layout: header, content, toasts, footer
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),          // Header
                Constraint::Min(6),             // Content
                Constraint::Length(toast_rows), // Toasts
                Constraint::Length(2),          // Footer
            ])
            .split(area);

        self.draw_header(frame, chunks[0]);
        frame.render_widget(SubscriptionPanel::new(&self.view, self.zone), chunks[1]);
        frame.render_widget(toasts, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if self.show_help {
            self.draw_help_overlay(frame, area);
        }

        if let Some(prompt) = self.view.confirm_prompt() {
            frame.render_widget(ConfirmDialog::new(prompt), area);
        }
    }

    /// Draw the header bar.
    fn draw_header(&self, frame: &mut Frame, area: Rect) {
        let title = " subdesk - Subscription ";

        let (status_text, status_color) = match self.view.display() {
            Display::ErrorOnly(_) => ("[Error]".to_string(), Color::Red),
            Display::Skeleton => ("[Loading...]".to_string(), Color::Yellow),
            Display::NoSubscription => ("[None]".to_string(), Color::DarkGray),
            Display::Card { loading: true, .. } => ("[Canceling...]".to_string(), Color::Yellow),
            Display::Card { outcome, .. } => {
                let color = match outcome {
                    SubscriptionOutcome::Active => Color::Green,
                    SubscriptionOutcome::PendingCancellation { .. } => Color::Yellow,
                    SubscriptionOutcome::Canceled => Color::DarkGray,
                    SubscriptionOutcome::Other(_) => Color::Cyan,
                };
                (format!("[{}]", outcome.label()), color)
            }
        };

        // Right-align the backend URL and status
        let right_content_len = self.base_url.len() + 2 + status_text.len();
        let spacing = area
            .width
            .saturating_sub(title.len() as u16 + right_content_len as u16 + 2)
            as usize;

        let header = Paragraph::new(Line::from(vec![
            Span::styled(
                title,
                Style::default()
                    .fg(Color::LightCyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" ".repeat(spacing)),
            Span::styled(self.base_url.clone(), Style::default().fg(Color::DarkGray)),
            Span::raw("  "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(header, area);
    }

    /// Draw the footer with hotkey hints.
    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let hotkey_style = Style::default().fg(Color::Yellow);
        let hints = if self.view.confirm_prompt().is_some() {
            vec![
                Span::styled("[y]", hotkey_style),
                Span::raw("Confirm "),
                Span::styled("[n]", hotkey_style),
                Span::raw("Keep subscription"),
            ]
        } else {
            let mut hints = Vec::new();
            if self.view.can_cancel() {
                hints.push(Span::styled("[x]", hotkey_style));
                hints.push(Span::raw("Cancel subscription "));
            }
            hints.extend([
                Span::styled("[?]", hotkey_style),
                Span::raw("Help "),
                Span::styled("[q]", hotkey_style),
                Span::raw("Quit"),
            ]);
            hints
        };

        let footer = Paragraph::new(Line::from(hints))
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::TOP));

        frame.render_widget(footer, area);
    }

    /// Draw the help overlay.
    fn draw_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let overlay_width = 50.min(area.width.saturating_sub(4));
        let overlay_height = 14.min(area.height.saturating_sub(4));
        let overlay_x = (area.width - overlay_width) / 2;
        let overlay_y = (area.height - overlay_height) / 2;

        let overlay_area = Rect::new(overlay_x, overlay_y, overlay_width, overlay_height);

        frame.render_widget(Clear, overlay_area);

        let help_text = "\
subdesk Hotkey Reference

Subscription:
  x  Enter   Cancel subscription
  y          Confirm (in prompt)
  n  Esc     Keep subscription (in prompt)

General:
  ?          Toggle this help
  Esc        Close help
  q          Quit
  Ctrl+C     Force quit";

        let help = Paragraph::new(help_text)
            .style(Style::default().fg(Color::White))
            .alignment(Alignment::Left)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::LightCyan))
                    .title(Span::styled(
                        " Help ",
                        Style::default()
                            .fg(Color::LightCyan)
                            .add_modifier(Modifier::BOLD),
                    ))
                    .style(Style::default().bg(Color::Black)),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(help, overlay_area);
    }
}
