//! Supply chain network console.
//!
//! Replays (or follows) a line-delimited agent session, rendering tool
//! results as cards and, optionally, the workflow debugger.

use std::error::Error;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::sync::mpsc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod app;
mod backend;
mod config;
mod error;
mod event;
mod feed;
mod state;
mod ui;

use app::App;
use config::{FeedConfig, PageConfig, DEFAULT_LOG_FILE, DEFAULT_LOG_FILTER};
use event::{BackendCommand, UiEvent};
use feed::StateFeed;

#[derive(Parser)]
#[command(name = "supplynet")]
#[command(about = "Supply chain network assistant console")]
#[command(version)]
struct Cli {
    /// Line-delimited JSON session to replay
    #[arg(short, long)]
    session: Option<PathBuf>,

    /// Keep reading lines appended to the session file
    #[arg(short, long)]
    follow: bool,

    /// Delay between replayed events, in milliseconds
    #[arg(long, default_value = "400")]
    pace_ms: u64,

    /// Agent whose state snapshots drive the workflow debugger
    #[arg(short, long)]
    agent: Option<String>,

    /// File that receives messages typed in the console
    #[arg(short, long)]
    outbox: Option<PathBuf>,

    /// Mount the workflow debugger on start
    #[arg(short, long)]
    workflow: bool,

    /// Page title
    #[arg(long)]
    title: Option<String>,

    /// Accent color (name or #rrggbb)
    #[arg(long)]
    primary_color: Option<String>,

    /// Log file
    #[arg(long, default_value = DEFAULT_LOG_FILE)]
    log_file: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to a file so they never draw over the terminal UI
    if let Ok(file) = std::fs::File::create(&cli.log_file) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        tracing_subscriber::fmt()
            .with_writer(std::sync::Mutex::new(file))
            .with_env_filter(filter)
            .with_ansi(false)
            .init();
    }

    let mut page = PageConfig {
        show_workflow: cli.workflow,
        ..PageConfig::default()
    };
    if let Some(title) = cli.title {
        page.title = title;
    }
    if let Some(color) = cli.primary_color.as_deref() {
        page.primary_color = config::parse_color(color)?;
    }

    let defaults = FeedConfig::default();
    let feed_config = FeedConfig {
        session_path: cli.session,
        follow: cli.follow,
        pace: Duration::from_millis(cli.pace_ms),
        agent_name: cli.agent.unwrap_or(defaults.agent_name),
        outbox_path: cli.outbox,
    };

    run_console(page, feed_config)
}

fn run_console(page: PageConfig, feed_config: FeedConfig) -> Result<(), Box<dyn Error>> {
    info!(
        session = ?feed_config.session_path,
        agent = %feed_config.agent_name,
        follow = feed_config.follow,
        "Starting console"
    );

    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>(100);
    let (cmd_tx, cmd_rx) = mpsc::channel::<BackendCommand>(100);

    let feed = StateFeed::new();
    let subscription = feed.subscribe();

    // Backend thread with its own tokio runtime
    let bg_handle = std::thread::spawn(move || {
        match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt.block_on(backend::run_backend(feed_config, feed, ui_tx, cmd_rx)),
            Err(e) => error!(error = %e, "Failed to create tokio runtime"),
        }
    });

    // Enters alternate screen, enables raw mode
    let terminal = ratatui::init();

    let mut app = App::new(page, ui_rx, cmd_tx, subscription);
    let result = app.run(terminal);

    ratatui::restore();

    let _ = bg_handle.join();

    info!("Console shutdown complete");

    result.map_err(|e| e.into())
}
