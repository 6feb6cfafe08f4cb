//! Attendee model.
//!
//! # Invariants
//! - Identity is the exact `name`; `created_at` never takes part in equality.

use chrono::{DateTime, Local};

/// A person physically present at the meeting.
#[derive(Debug, Clone)]
pub struct Person {
    pub name: String,
    /// Local time the person was registered (or re-registered on replay).
    pub created_at: DateTime<Local>,
}

impl Person {
    /// Creates a person registered at the current local time.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_created_at(name, Local::now())
    }

    pub fn with_created_at(name: impl Into<String>, created_at: DateTime<Local>) -> Self {
        Self {
            name: name.into(),
            created_at,
        }
    }
}

impl PartialEq for Person {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Person {}
