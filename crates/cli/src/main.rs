//! treewatch - debounced recursive file-change notifier
//!
//! This binary watches directory trees and prints (or runs a command for)
//! each path once its burst of changes settles.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use treewatch::{ExecCallback, PrintCallback};
use treewatch_core::config::Config;
use treewatch_watcher::{SessionConfig, WatchHandle, WatchSession};

#[derive(Parser, Debug)]
#[command(name = "treewatch")]
#[command(about = "Watch directory trees and report debounced changes")]
#[command(version)]
struct Cli {
    /// Directories (or files) to watch recursively
    #[arg(required = true, value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Debounce window in milliseconds; zero or negative selects the default
    #[arg(short, long, value_name = "MS", allow_negative_numbers = true)]
    delay_ms: Option<i64>,

    /// Shell command to run per change; the path is passed as $1 and $TREEWATCH_PATH
    #[arg(short = 'x', long, value_name = "COMMAND")]
    exec: Option<String>,

    /// Additional substring to ignore (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Follow symbolic links while walking the trees
    #[arg(long)]
    follow_symlinks: bool,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Merge command-line flags over the loaded configuration
    fn session_config(&self, config: &Config) -> SessionConfig {
        let extra_ignore = config
            .watcher
            .extra_ignore
            .iter()
            .chain(self.ignore.iter())
            .cloned();

        let builder = SessionConfig::builder()
            .delay(config.watcher.debounce_duration())
            .extra_ignore(extra_ignore)
            .follow_symlinks(config.watcher.follow_symlinks || self.follow_symlinks);

        match self.delay_ms {
            Some(ms) => builder.delay_ms(Some(ms)).build(),
            None => builder.build(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose)?;

    let config = Config::load(cli.config.as_deref())?;
    config.validate()?;

    let session = WatchSession::new(cli.session_config(&config));
    debug!("Session configuration: {:?}", session.config());

    let handle = match start(&session, &cli).await {
        Ok(handle) => handle,
        Err(e) if e.is_setup_error() => {
            error!("{e}");
            std::process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl-C")?;
    info!("Shutting down");

    let stats = handle.shutdown().await?;
    debug!("Final statistics: {:?}", stats);
    Ok(())
}

async fn start(session: &WatchSession, cli: &Cli) -> treewatch_core::Result<WatchHandle> {
    let paths = cli.paths.iter().cloned();
    match &cli.exec {
        Some(command) => session.start(paths, ExecCallback::new(command)).await,
        None => session.start(paths, PrintCallback).await,
    }
}

/// Initialize logging; logs go to stderr so stdout carries only paths
fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "treewatch_core={level},treewatch_watcher={level},{}={level}",
            env!("CARGO_CRATE_NAME")
        ))
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}
