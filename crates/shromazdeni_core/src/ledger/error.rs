//! Errors returned by ledger operations.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Recoverable failure of a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    FlatNotFound(String),
    PersonNotFound(String),
    PersonAlreadyExists(String),
}

impl LedgerError {
    /// Returns whether the error reports an unknown flat or person name.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FlatNotFound(_) | Self::PersonNotFound(_))
    }
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FlatNotFound(name) => write!(f, "unit not found: `{name}`"),
            Self::PersonNotFound(name) => write!(f, "person not present: `{name}`"),
            Self::PersonAlreadyExists(name) => write!(f, "person already present: `{name}`"),
        }
    }
}

impl Error for LedgerError {}
