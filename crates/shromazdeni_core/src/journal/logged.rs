//! Ledger wrapper that records every successful mutation.
//!
//! # Invariants
//! - Mutations go through this wrapper only; it never hands out `&mut Ledger`.
//! - A failing ledger operation writes nothing.
//! - A failing log write after a successful mutation is reported as
//!   `SessionError::Journal`; the caller must stop the session because memory
//!   and log have diverged.

use super::{CommandLog, JournalError};
use crate::ledger::{Command, Ledger, LedgerError};
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;

pub type SessionResult<T> = Result<T, SessionError>;

#[derive(Debug)]
pub enum SessionError {
    Ledger(LedgerError),
    Journal(JournalError),
}

impl SessionError {
    /// Returns the ledger error when the operation itself was rejected.
    pub fn as_ledger(&self) -> Option<&LedgerError> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Journal(_) => None,
        }
    }
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ledger(err) => write!(f, "{err}"),
            Self::Journal(err) => write!(f, "failed to record command: {err}"),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Ledger(err) => Some(err),
            Self::Journal(err) => Some(err),
        }
    }
}

impl From<LedgerError> for SessionError {
    fn from(value: LedgerError) -> Self {
        Self::Ledger(value)
    }
}

impl From<JournalError> for SessionError {
    fn from(value: JournalError) -> Self {
        Self::Journal(value)
    }
}

/// Ledger plus the log every mutation is appended to.
pub struct LoggedLedger<W: Write> {
    ledger: Ledger,
    log: CommandLog<W>,
}

impl<W: Write> LoggedLedger<W> {
    pub fn new(ledger: Ledger, log: CommandLog<W>) -> Self {
        Self { ledger, log }
    }

    /// Read-only view for queries and rendering.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn log(&self) -> &CommandLog<W> {
        &self.log
    }

    pub fn add_person(&mut self, name: &str) -> SessionResult<()> {
        self.ledger.add_person(name)?;
        self.record(Command::AddPerson {
            name: name.to_string(),
        })
    }

    pub fn represent_flat(&mut self, flat_name: &str, person_name: &str) -> SessionResult<()> {
        self.ledger.represent_flat(flat_name, person_name)?;
        self.record(Command::RepresentFlat {
            flat: flat_name.to_string(),
            person: person_name.to_string(),
        })
    }

    pub fn remove_flat_representative(&mut self, flat_name: &str) -> SessionResult<()> {
        self.ledger.remove_flat_representative(flat_name)?;
        self.record(Command::RemoveFlatRepresentative {
            flat: flat_name.to_string(),
        })
    }

    /// Removes a person; the released flats are re-derived on replay from
    /// this single record.
    pub fn remove_person(&mut self, name: &str) -> SessionResult<Vec<String>> {
        let released = self.ledger.remove_person(name)?;
        self.record(Command::RemovePerson {
            name: name.to_string(),
        })?;
        Ok(released)
    }

    fn record(&mut self, command: Command) -> SessionResult<()> {
        self.log.append(&command).map_err(|err| {
            error!(
                "event=journal_append module=journal status=error op={} error={}",
                command.operation(),
                err
            );
            SessionError::Journal(err)
        })
    }
}
