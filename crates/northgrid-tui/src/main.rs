//! `northgrid`: terminal grid and form editor for a customers REST resource.
//!
//! Built on [ratatui](https://ratatui.rs). The grid lists every customer;
//! `Enter` opens the edit dialog on the selected row and `a` opens an empty
//! create dialog. Saves, creates and deletes run in the background and the
//! list is re-fetched after each one that succeeds.
//!
//! Logs are written to a file (default `/tmp/northgrid.log`) so they never
//! corrupt the terminal.
//!
//! Entry point: argument parsing, tracing setup, panic hooks, config
//! resolution and app launch.

mod action;
mod app;
mod component;
mod event;
mod screens;
mod theme;
mod tui;
mod widgets;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use secrecy::SecretString;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use northgrid_core::{ClientConfig, CustomerApi};

use crate::app::App;
use crate::screens::CustomersScreen;

/// Browse and edit customers of a Northwind-style REST API.
#[derive(Parser, Debug)]
#[command(name = "northgrid", version, about)]
struct Cli {
    /// Customers collection URL (e.g., https://localhost:7244/customers)
    #[arg(short = 'u', long, env = "NORTHGRID_URL")]
    url: Option<String>,

    /// Bearer token for create/update/delete (falls back to NORTHGRID_TOKEN)
    #[arg(short = 't', long)]
    token: Option<String>,

    /// Config profile to use
    #[arg(short = 'p', long, env = "NORTHGRID_PROFILE")]
    profile: Option<String>,

    /// Accept invalid TLS certificates (local dev servers)
    #[arg(long)]
    insecure: bool,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Show list-fetch failures instead of silently emptying the grid
    #[arg(long)]
    strict_list_errors: bool,

    /// Log file path
    #[arg(long, default_value = "/tmp/northgrid.log")]
    log_file: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// File-based tracing. Nothing may go to stdout/stderr while the TUI runs.
/// Hold the returned guard until exit so buffered lines are flushed.
fn setup_tracing(cli: &Cli) -> WorkerGuard {
    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    // "northgrid" also matches the northgrid_* library targets.
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("northgrid={log_level}")));

    let log_dir = cli
        .log_file
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(std::path::Path::new("."));
    let log_filename = cli
        .log_file
        .file_name()
        .unwrap_or(std::ffi::OsStr::new("northgrid.log"));

    let file_appender = tracing_appender::rolling::never(log_dir, log_filename);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(true),
        )
        .init();

    guard
}

/// Resolve the client config. CLI flags override the selected profile.
fn build_client_config(cli: &Cli) -> Result<ClientConfig> {
    let cfg = northgrid_config::load_config_or_default();
    let profile_name = cfg.active_profile_name(cli.profile.as_deref());
    let mut profile = cfg.profile(&profile_name);

    if let Some(ref url) = cli.url {
        profile.api_url.clone_from(url);
    }
    if cli.insecure {
        profile.insecure = Some(true);
    }
    if let Some(timeout) = cli.timeout {
        profile.timeout = Some(timeout);
    }
    if cli.strict_list_errors {
        profile.strict_list_errors = Some(true);
    }

    let token = cli.token.clone().map(SecretString::from);
    northgrid_config::profile_to_client_config(&profile, &profile_name, &cfg.defaults, token)
        .wrap_err_with(|| format!("invalid configuration for profile '{profile_name}'"))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Hooks go in before the terminal is touched.
    tui::install_hooks()?;

    let _log_guard = setup_tracing(&cli);

    let config = build_client_config(&cli)?;
    info!(
        endpoint = %config.endpoint,
        token = config.token.is_some(),
        list_failure = ?config.list_failure,
        "starting northgrid"
    );

    let client = northgrid_core::connect(&config)?;
    let api: Arc<dyn CustomerApi> = Arc::new(client);

    let screen = CustomersScreen::new(api, config.list_failure);
    let mut app = App::new(screen, config.endpoint.to_string());
    app.run().await?;

    Ok(())
}
