//! Domain model for the ownership ledger.
//!
//! # Responsibility
//! - Define the value records describing ownership shares and attendees.
//! - Keep ownership fractions exact (`BigRational`), never floating point.
//!
//! # Invariants
//! - A `Flat` is created once at load time; only its representative mutates,
//!   and only through `Ledger`.
//! - A `Person` is identified by its exact, case-sensitive name.

pub mod flat;
pub mod fraction;
pub mod person;
