//! Representation ledger: the in-memory source of truth for a meeting.
//!
//! # Responsibility
//! - Own flats and the registry of present persons.
//! - Expose every state transition as one named operation (`Command`) so it
//!   can be logged and replayed.
//! - Derive the exact represented percentage and the quorum decision.
//!
//! # Invariants
//! - A flat has at most one representative.
//! - A flat's representative is always a person currently in the registry.
//! - Failed operations leave state untouched.

mod command;
mod error;
mod state;

pub use command::Command;
pub use error::{LedgerError, LedgerResult};
pub use state::{format_percent, Ledger};
