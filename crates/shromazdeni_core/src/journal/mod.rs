//! Durable, replayable command log.
//!
//! # Responsibility
//! - Append every successful mutating ledger call as one CSV record.
//! - Rebuild ledger state by replaying a previously written log.
//! - Open the log for a dataset, creating it with a header when missing.
//!
//! # Invariants
//! - A record is written only after the in-memory mutation succeeded, and is
//!   flushed before control returns to the caller.
//! - The header record and operation names are stable across restarts.
//! - Replay dispatches through the closed `Command` enum.

use crate::ledger::LedgerError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod command_log;
mod logged;
mod open;

pub use command_log::{replay, CommandLog, LOG_HEADER, TIME_FORMAT};
pub use logged::{LoggedLedger, SessionError, SessionResult};
pub use open::{default_log_path, open_existing, open_or_create, OpenedLog};

pub type JournalResult<T> = Result<T, JournalError>;

#[derive(Debug)]
pub enum JournalError {
    Io(std::io::Error),
    Csv(csv::Error),
    /// First record is not the expected header.
    InvalidHeader(Vec<String>),
    /// Record has fewer than the time and operation columns.
    TruncatedRecord { line: u64 },
    UnknownOperation { line: u64, operation: String },
    InvalidArity {
        line: u64,
        operation: String,
        expected: usize,
        found: usize,
    },
    /// A logged operation failed when re-applied to the ledger.
    Replay {
        line: u64,
        operation: String,
        source: LedgerError,
    },
}

impl Display for JournalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Csv(err) => write!(f, "{err}"),
            Self::InvalidHeader(fields) => {
                write!(f, "unexpected command log header: {}", fields.join(","))
            }
            Self::TruncatedRecord { line } => {
                write!(f, "command log line {line}: record has no operation")
            }
            Self::UnknownOperation { line, operation } => {
                write!(f, "command log line {line}: unknown operation `{operation}`")
            }
            Self::InvalidArity {
                line,
                operation,
                expected,
                found,
            } => write!(
                f,
                "command log line {line}: `{operation}` takes {expected} argument(s), found {found}"
            ),
            Self::Replay {
                line,
                operation,
                source,
            } => write!(f, "command log line {line}: `{operation}` failed: {source}"),
        }
    }
}

impl Error for JournalError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Csv(err) => Some(err),
            Self::Replay { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for JournalError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<csv::Error> for JournalError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}
