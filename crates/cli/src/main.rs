//! CLI entrypoint for the terminal chat client.

mod config;
#[cfg(test)]
mod test_support;
mod tui;

use clap::Parser;

#[cfg(not(test))]
use client::{ChatController, CompletionClient};
#[cfg(not(test))]
use config::Config;
#[cfg(not(test))]
use tracing::{info, warn};
#[cfg(not(test))]
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Top-level command-line arguments for the chainchat application.
#[derive(Parser)]
#[command(name = "chainchat")]
#[command(about = "Streaming terminal chat for a web3 assistant", version = "0.1.0")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Enable debug logging to ~/.chainchat/logs/debug.YYYY-MM-DD.log
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// Completion endpoint override (also settable via CHAINCHAT_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,
}

#[cfg(not(test))]
#[tokio::main]
/// Program entrypoint.
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console output goes to a sink because the TUI owns
    // the screen. When --debug is passed, write debug-level logs to
    // ~/.chainchat/logs/debug.YYYY-MM-DD.log using daily rotation so logs
    // accumulate across sessions.
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    // WorkerGuard must outlive main() so buffered file writes are flushed on exit.
    let _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>;

    let debug_writer = if cli.debug {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let log_dir = std::path::PathBuf::from(home).join(".chainchat").join("logs");
        std::fs::create_dir_all(&log_dir).ok();
        let appender = tracing_appender::rolling::daily(&log_dir, "debug.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        _file_guard = Some(guard);
        Some(writer)
    } else {
        _file_guard = None;
        None
    };

    match debug_writer {
        Some(writer) => {
            let console = fmt::layer()
                .with_writer(std::io::sink)
                .with_target(false)
                .with_filter(console_filter);
            let file = fmt::layer()
                .with_writer(writer)
                .with_target(true)
                .with_ansi(false)
                .with_filter(EnvFilter::new("debug,hyper_util=info,rustls=info,reqwest=info"));
            tracing_subscriber::registry()
                .with(console)
                .with(file)
                .init();
        }
        None => {
            fmt()
                .with_env_filter(console_filter)
                .with_writer(std::io::sink)
                .with_target(false)
                .init();
        }
    }

    if cli.debug {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            log_level = %cli.log_level,
            "========== chainchat session start =========="
        );
    }

    let config = Config::load(cli.config.as_deref()).unwrap_or_else(|e| {
        warn!("Failed to load config ({e}), using defaults");
        Config::default()
    });

    let endpoint = cli.endpoint.unwrap_or(config.chat.endpoint);
    let controller = ChatController::new(CompletionClient::with_endpoint(&endpoint));

    tui::run_tui(controller).await?;

    println!("{}", format_goodbye(&endpoint));
    Ok(())
}

/// Formats the farewell line printed after the TUI exits.
fn format_goodbye(endpoint: &str) -> String {
    format!("chainchat session ended (endpoint: {endpoint})")
}
