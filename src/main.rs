//! subdesk - subscription management in the terminal
//!
//! Shows the current subscription and lets the user cancel it.
//!
//! ## Usage
//!
//! ```bash
//! # Open the subscription view
//! subdesk
//!
//! # Against a different backend
//! subdesk --base-url https://billing.example.com
//!
//! # With verbose logging and a custom log directory
//! subdesk -v --log-dir /path/to/logs/
//! ```

use std::io::Write;
use std::panic;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use subdesk_client::HttpSubscriptionClient;
use subdesk_core::{init_logging, LogGuard, SubdeskConfig};
use subdesk_tui::App;
use tracing::{error, info};

/// Subscription view for the terminal
///
/// Fetches the current subscription from the billing backend and offers
/// cancellation behind a confirmation prompt.
#[derive(Parser, Debug)]
#[command(name = "subdesk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging (increases log level)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Directory for log files (defaults to ~/.subdesk/logs/)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.subdesk/config.yaml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding the config file
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match setup_logging(&cli) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {}", e);
            return ExitCode::from(1);
        }
    };

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            eprintln!("Error: {}", e);
            if let Some(hint) = e.guidance() {
                eprintln!("\n{}", hint);
            }
            return ExitCode::from(if e.is_config_error() { 2 } else { 1 });
        }
    };

    // Install panic hook to ensure terminal cleanup
    install_panic_hook();

    info!(base_url = %config.api.base_url, "starting subdesk");

    match run_app(&config) {
        Ok(()) => {
            info!("subdesk exited normally");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("subdesk error: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(1)
        }
    }
}

/// Install a panic hook that restores the terminal before printing the panic message.
fn install_panic_hook() {
    let original_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal();
        original_hook(panic_info);
    }));
}

/// Restore terminal to its normal state.
fn restore_terminal() -> std::io::Result<()> {
    let mut stdout = std::io::stdout();

    let _ = crossterm::terminal::disable_raw_mode();
    crossterm::execute!(
        stdout,
        crossterm::terminal::LeaveAlternateScreen,
        crossterm::cursor::Show
    )?;
    stdout.flush()
}

/// Set up logging based on CLI arguments.
fn setup_logging(cli: &Cli) -> subdesk_core::Result<LogGuard> {
    init_logging(cli.log_dir.clone(), cli.verbose > 0)
}

/// Load the config file and apply CLI overrides.
fn load_config(cli: &Cli) -> subdesk_core::Result<SubdeskConfig> {
    let mut config = SubdeskConfig::load(cli.config.as_deref())?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
        config.validate()?;
    }
    Ok(config)
}

/// Run the TUI application.
fn run_app(config: &SubdeskConfig) -> subdesk_tui::AppResult<()> {
    let client = HttpSubscriptionClient::from_config(&config.api)?;
    let mut app = App::new(config, Arc::new(client))?;
    app.run()
}
