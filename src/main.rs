//! Main application entry point (CLI binary).
//!
//! This is a thin wrapper around the `seo_audit` library that handles:
//! - Command-line argument parsing
//! - Environment variable loading (.env file)
//! - Logger initialization
//! - Progress logging and report output
//!
//! All core functionality is implemented in the library crate.

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::process;
use tokio::sync::mpsc;

use seo_audit::config::{ProgressEvent, PROGRESS_LOG_EVERY};
use seo_audit::export::write_report;
use seo_audit::initialization::init_logger_with;
use seo_audit::{audit_page_with, Collaborators, Config};

/// Logs link-audit progress until the sender side is dropped.
async fn log_progress(mut events: mpsc::UnboundedReceiver<ProgressEvent>) {
    let mut last_logged = 0;
    while let Some(ProgressEvent { completed, total }) = events.recv().await {
        if completed == total || completed >= last_logged + PROGRESS_LOG_EVERY {
            info!("Checked {}/{} targets", completed, total);
            last_logged = completed;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // API keys may live in a .env file next to the invocation or the executable
    if dotenvy::dotenv().is_err() {
        if let Ok(exe_path) = std::env::current_exe() {
            if let Some(exe_dir) = exe_path.parent() {
                let env_path = exe_dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                }
            }
        }
    }

    let config = Config::parse();

    let log_level = config.log_level.clone();
    let log_format = config.log_format.clone();
    init_logger_with(log_level.into(), log_format).context("Failed to initialize logger")?;

    let collaborators = Collaborators::from_config(&config);

    let (progress_tx, progress_rx) = mpsc::unbounded_channel();
    let progress_task = tokio::spawn(log_progress(progress_rx));
    let mut options = config.link_audit_options();
    options.progress = Some(progress_tx);

    let result = audit_page_with(&config, options, &collaborators).await;
    // The options (and with them the sender) are gone once the audit returns
    let _ = progress_task.await;

    match result {
        Ok(report) => {
            write_report(&report, config.format, config.output.as_deref())
                .context("Failed to write report")?;
            if let Some(path) = &config.output {
                info!("Report written to {}", path.display());
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("seo_audit error: {:#}", e);
            process::exit(1);
        }
    }
}
