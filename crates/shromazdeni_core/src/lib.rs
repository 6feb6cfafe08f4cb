//! Core bookkeeping for an owners' meeting.
//! This crate is the single source of truth for representation and quorum
//! invariants, and for recovering them after a restart.

pub mod journal;
pub mod ledger;
pub mod loader;
pub mod logging;
pub mod model;

pub use journal::{
    default_log_path, open_existing, open_or_create, replay, CommandLog, JournalError,
    JournalResult, LoggedLedger, OpenedLog, SessionError, SessionResult,
};
pub use ledger::{format_percent, Command, Ledger, LedgerError, LedgerResult};
pub use loader::{load_flats, load_flats_from_path, LoadError, LoadResult};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::flat::{Flat, Owner};
pub use model::fraction::{parse_fraction, Fraction};
pub use model::person::Person;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
