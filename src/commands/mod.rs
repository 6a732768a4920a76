//! Subcommand implementations.

pub mod clean;
pub mod scan;

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::ScanFlags;
use crate::config::Config;
use crate::scanner::{ScanOptions, ScanProgress, ScanResult, Scanner};

/// Config values overridden by whatever was given on the command line.
pub fn scan_options(flags: &ScanFlags, config: &Config) -> ScanOptions {
    let mut options = config.scan_options();
    if let Some(depth) = flags.max_depth {
        options.max_depth = Some(depth);
    }
    if flags.no_docker {
        options.include_docker = false;
    }
    if let Some(secs) = flags.timeout {
        options.timeout = Some(Duration::from_secs(secs));
    }
    if let Some(jobs) = flags.jobs {
        options.threads = jobs;
    }
    if flags.one_file_system {
        options.one_file_system = true;
    }
    options
}

/// Explicit path, else the user's home directory.
pub fn scan_root(flags: &ScanFlags) -> Result<PathBuf> {
    match &flags.path {
        Some(path) => Ok(path.clone()),
        None => dirs::home_dir().context("Could not determine the home directory"),
    }
}

/// Run a scan, showing a spinner on stderr unless `quiet`.
pub fn run_scan(flags: &ScanFlags, config: &Config, quiet: bool) -> Result<ScanResult> {
    let root = scan_root(flags)?;
    let options = scan_options(flags, config);
    let progress = Arc::new(ScanProgress::new());
    let scanner = Scanner::with_defaults(config.catalog()?, &options).with_progress(Arc::clone(&progress));

    tracing::info!(path = %root.display(), ?options, "Scanning");

    if quiet {
        return Ok(scanner.scan(&root, &options)?);
    }

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}").unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = std::thread::scope(|s| {
        let handle = s.spawn(|| scanner.scan(&root, &options));
        while !handle.is_finished() {
            spinner.set_message(format!(
                "{} dirs, {} found, {} measured{}",
                progress.dirs_visited(),
                progress.discovered(),
                progress.measured(),
                progress
                    .current()
                    .map(|p| format!(" ({})", p.display()))
                    .unwrap_or_default()
            ));
            std::thread::sleep(Duration::from_millis(100));
        }
        handle.join()
    });
    spinner.finish_and_clear();

    match result {
        Ok(scan) => Ok(scan?),
        Err(_) => anyhow::bail!("Scan thread panicked"),
    }
}
