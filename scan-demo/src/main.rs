mod commands;
mod console_delegate;
mod settings;
mod still_camera;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use scan_core::{FileStore, HistoryLedger, MockAnalyzer, ScanSession};

use crate::console_delegate::ConsoleDelegate;
use crate::still_camera::StillCamera;

#[derive(Parser)]
#[command(name = "clothing-scan", about = "Scan clothing photos and keep a local scan history")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding the scan history
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze an uploaded photo
    Scan { image: PathBuf },
    /// Take a photo with the still-frame camera and analyze it
    Capture {
        frame: PathBuf,
        /// Simulate the user refusing camera access
        #[arg(long)]
        deny_permission: bool,
    },
    /// List past scans, newest first
    History,
    /// Remove one scan from the history
    Delete { index: usize },
    /// Remove every scan from the history
    Clear,
    /// Print the share text for a past scan
    Share { index: usize },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let config = settings::load_config(cli.config.as_deref())?;
    let data_dir = match cli.data_dir {
        Some(dir) => dir,
        None => settings::default_data_dir(),
    };
    let store = FileStore::open(&data_dir)
        .with_context(|| format!("opening history in {}", data_dir.display()))?;
    let history = Arc::new(HistoryLedger::from_config(store, &config));

    let (frame, deny_permission) = match &cli.command {
        Command::Capture {
            frame,
            deny_permission,
        } => (Some(frame.clone()), *deny_permission),
        _ => (None, false),
    };
    let camera = StillCamera::new(frame, !deny_permission);

    let mut session = ScanSession::new(camera, MockAnalyzer::from_config(&config), history, config)?;
    session.set_delegate(ConsoleDelegate::new());

    match cli.command {
        Command::Scan { image } => commands::scan_file(&session, &image).await,
        Command::Capture { .. } => commands::capture_photo(&session).await,
        Command::History => commands::list_history(&session),
        Command::Delete { index } => commands::delete_entry(&session, index),
        Command::Clear => commands::clear_history(&session),
        Command::Share { index } => commands::share_entry(&session, index),
    }
}
