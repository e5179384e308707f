//! Terminal Logging Module
//!
//! - Structured logging through `tracing` (JSON file + human-readable stderr)
//! - `log` macros bridged into `tracing`
//! - miette error reporting for the CLI
//! - Spinners and styled output for interactive commands

use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

use console::{style, StyledObject};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

const LOG_FILE_PREFIX: &str = "curio.log";

// ============================================================================
// Logging Initialization
// ============================================================================

/// Initialize the logging system.
///
/// This sets up:
/// 1. A daily rolling JSON file logger in `log_dir`.
/// 2. A compact stderr logger (warnings only unless `verbose`).
/// 3. Redirects standard `log` crate events to `tracing`.
/// 4. Configures miette for error reporting.
///
/// Returns a `WorkerGuard` which must be kept alive for the duration of the
/// application so buffered logs are flushed on shutdown.
pub fn init(log_dir: &Path, verbose: bool) -> WorkerGuard {
    if !log_dir.exists() {
        if let Err(e) = fs::create_dir_all(log_dir) {
            eprintln!("Failed to create logs directory: {}", e);
        }
    }

    let file_appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,curio=debug"));
    let stderr_filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("curio=debug"))
    } else {
        EnvFilter::new("warn")
    };

    // File Layer: JSON format for easy parsing/ingestion
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .json()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(true)
        .with_filter(file_filter);

    // Stderr Layer: keeps stdout free for chat output
    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stderr)
        .compact()
        .with_target(false)
        .with_filter(stderr_filter);

    if tracing_subscriber::registry()
        .with(file_layer)
        .with(stderr_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Logging already initialized");
    }

    // Redirect standard `log` macros to `tracing`; a no-op if the registry already did it
    let _ = tracing_log::LogTracer::init();

    init_miette();

    tracing::info!(
        log_file = %log_dir.join(LOG_FILE_PREFIX).display(),
        "Logging initialized (daily rolling)"
    );

    guard
}

/// Logging for tests: writes through the test harness, safe to call repeatedly.
pub fn init_for_tests() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("curio=debug")),
        )
        .try_init();
}

fn init_miette() {
    let colorize = console::colors_enabled_stderr();
    miette::set_hook(Box::new(move |_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .unicode(colorize)
                .context_lines(3)
                .tab_width(4)
                .break_words(true)
                .color(colorize)
                .build(),
        )
    }))
    .ok(); // Ignore if already set
}

// ============================================================================
// Terminal Output
// ============================================================================

/// Spinner for indeterminate operations (model calls, scraping).
pub fn spinner(message: impl Into<String>) -> ProgressBar {
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
        .template("{spinner:.cyan} {msg}")
    {
        bar.set_style(style);
    }
    bar.set_message(message.into());
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

pub fn heading(text: &str) -> StyledObject<&str> {
    style(text).bold().cyan()
}

pub fn persona_label(text: &str) -> StyledObject<&str> {
    style(text).bold().magenta()
}

pub fn muted(text: &str) -> StyledObject<&str> {
    style(text).dim()
}

pub fn warning(text: &str) -> StyledObject<&str> {
    style(text).yellow()
}
