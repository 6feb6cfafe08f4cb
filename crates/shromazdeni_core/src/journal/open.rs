//! Bootstrap of the command log for one ownership dataset.
//!
//! # Invariants
//! - An existing log is fully replayed before the ledger is returned.
//! - A new log is created exclusively and starts with the header record.
//! - The returned log appends after the last replayed record.
//! - Appending always starts on a fresh line, even after a torn last record.

use super::{replay, CommandLog, JournalResult};
use crate::ledger::Ledger;
use chrono::NaiveDate;
use log::{error, info, warn};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Log opened for appending, with what bootstrap did to reach it.
pub struct OpenedLog {
    pub log: CommandLog<File>,
    pub path: PathBuf,
    /// Records applied to the ledger during replay.
    pub replayed: usize,
    /// Whether the file did not exist before.
    pub created: bool,
}

/// Default log path: the dataset path with its extension replaced by
/// `.<YYYYMMDD>.log`.
pub fn default_log_path(flats_path: impl AsRef<Path>, date: NaiveDate) -> PathBuf {
    flats_path
        .as_ref()
        .with_extension(format!("{}.log", date.format("%Y%m%d")))
}

/// Replays the log at `path` into `ledger`, or creates it when missing.
///
/// # Side effects
/// - Emits `journal_open` logging events with duration and status.
pub fn open_or_create(path: impl AsRef<Path>, ledger: &mut Ledger) -> JournalResult<OpenedLog> {
    let path = path.as_ref();
    let exists = path.exists();
    let mode = if exists { "replay" } else { "create" };
    with_open_events(mode, || {
        if exists {
            replay_existing(path, ledger)
        } else {
            create_new(path)
        }
    })
}

/// Replays a log the caller named explicitly; the file must exist.
pub fn open_existing(path: impl AsRef<Path>, ledger: &mut Ledger) -> JournalResult<OpenedLog> {
    let path = path.as_ref();
    with_open_events("explicit", || replay_existing(path, ledger))
}

fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    file.seek(SeekFrom::End(-1))?;
    let mut last = [0u8; 1];
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn replay_existing(path: &Path, ledger: &mut Ledger) -> JournalResult<OpenedLog> {
    let source = File::open(path)?;
    let is_empty = source.metadata()?.len() == 0;
    let replayed = replay(source, ledger)?;

    let mut sink = OpenOptions::new().read(true).append(true).open(path)?;
    let log = if is_empty {
        CommandLog::create(sink)?
    } else {
        if !ends_with_newline(&mut sink)? {
            warn!(
                "event=journal_open module=journal status=repaired reason=unterminated_last_record"
            );
            sink.write_all(b"\n")?;
            sink.flush()?;
        }
        CommandLog::new(sink)
    };

    Ok(OpenedLog {
        log,
        path: path.to_path_buf(),
        replayed,
        created: false,
    })
}

fn create_new(path: &Path) -> JournalResult<OpenedLog> {
    let sink = OpenOptions::new().write(true).create_new(true).open(path)?;
    Ok(OpenedLog {
        log: CommandLog::create(sink)?,
        path: path.to_path_buf(),
        replayed: 0,
        created: true,
    })
}

fn with_open_events(
    mode: &str,
    open: impl FnOnce() -> JournalResult<OpenedLog>,
) -> JournalResult<OpenedLog> {
    let started_at = Instant::now();
    info!("event=journal_open module=journal status=start mode={mode}");

    match open() {
        Ok(opened) => {
            info!(
                "event=journal_open module=journal status=ok mode={} records={} duration_ms={}",
                mode,
                opened.replayed,
                started_at.elapsed().as_millis()
            );
            Ok(opened)
        }
        Err(err) => {
            error!(
                "event=journal_open module=journal status=error mode={} duration_ms={} error={}",
                mode,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::default_log_path;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    #[test]
    fn default_log_path_replaces_extension_with_date() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert_eq!(
            default_log_path("data/building.json", date),
            PathBuf::from("data/building.20240501.log")
        );
        assert_eq!(
            default_log_path("building", date),
            PathBuf::from("building.20240501.log")
        );
    }
}
