//! Command-line configuration.
//!
//! # Invariants
//! - The diagnostic log directory handed to core logging is absolute.
//! - Without `--log`, the command log lives next to the dataset, one per day.

use chrono::NaiveDate;
use clap::Parser;
use shromazdeni_core::{default_log_level, default_log_path};
use std::path::{Path, PathBuf};

const DEFAULT_LOG_DIR_NAME: &str = "shromazdeni-logs";

/// Records presence and representation on an owners' meeting.
#[derive(Debug, Parser)]
#[command(name = "shromazdeni", version, about)]
pub struct Cli {
    /// JSON file with the flats definition
    pub flats: PathBuf,

    /// Existing command log to replay and continue
    #[arg(long, value_name = "LOGFILE")]
    pub log: Option<PathBuf>,

    /// Diagnostic log level (trace|debug|info|warn|error)
    #[arg(long, env = "SHROMAZDENI_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for diagnostic logs
    #[arg(long, env = "SHROMAZDENI_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Cli {
    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }

    /// Absolute diagnostic log directory.
    pub fn log_dir(&self) -> std::io::Result<PathBuf> {
        match &self.log_dir {
            Some(dir) => absolute(dir),
            None => Ok(std::env::temp_dir().join(DEFAULT_LOG_DIR_NAME)),
        }
    }

    /// Command log to use, and whether the user named it explicitly.
    pub fn command_log(&self, today: NaiveDate) -> (PathBuf, bool) {
        match &self.log {
            Some(path) => (path.clone(), true),
            None => (default_log_path(&self.flats, today), false),
        }
    }
}

fn absolute(path: &Path) -> std::io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}
