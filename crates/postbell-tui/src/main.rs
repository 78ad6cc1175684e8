mod demo;
mod input;
mod render;
mod runtime;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;
use postbell_core::tracing_setup::init_tracing;
use postbell_core::{
    follow_identity, FeedConfig, MemoryBackend, NotificationBackend, NotificationFeed,
};
use tokio::sync::watch;

use crate::demo::DemoHarness;
use crate::runtime::run_app;
use crate::ui::App;

#[derive(Parser)]
#[command(name = "postbell-tui")]
#[command(about = "Notification bell for the postbell blog client")]
struct Cli {
    /// Path to JSON config file (visibleWindow, dateFormat, logFile, logLevel)
    #[arg(long, short = 'c')]
    config: Option<PathBuf>,

    /// Demo account to sign in as (u1, u2, u3)
    #[arg(long, short = 'u', default_value = "u1")]
    user: String,

    /// Start signed out
    #[arg(long)]
    signed_out: bool,

    /// Simulated backend round trip in milliseconds
    #[arg(long, default_value_t = 150)]
    latency_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FeedConfig::resolve(cli.config.as_deref())?;
    init_tracing(config.log_file.as_deref(), &config.log_level)?;

    let backend = MemoryBackend::new().with_latency(Duration::from_millis(cli.latency_ms));
    demo::seed(&backend);
    let backend: Arc<dyn NotificationBackend> = Arc::new(backend);
    let feed = Arc::new(NotificationFeed::new(backend.clone()));
    let harness = DemoHarness::new(backend);

    let initial_identity = if cli.signed_out {
        None
    } else {
        Some(
            harness
                .account(&cli.user)
                .ok_or_else(|| anyhow!("Unknown demo account: {}", cli.user))?,
        )
    };
    let (identity_tx, identity_rx) = watch::channel(initial_identity);
    let follower = tokio::spawn(follow_identity(feed.clone(), identity_rx));

    let mut app = App::new(feed, identity_tx, config, harness);

    ui::terminal::install_panic_hook();
    let mut terminal = ui::init_terminal()?;
    let result = run_app(&mut terminal, &mut app).await;
    ui::restore_terminal()?;

    // Dropping the identity sender signs the feed out and releases its query.
    drop(app);
    if let Err(e) = follower.await {
        tracing::error!(error = %e, "Identity follower failed");
    }

    if let Err(err) = result {
        eprintln!("Error: {err}");
    }

    Ok(())
}
