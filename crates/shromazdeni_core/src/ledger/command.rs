//! Closed set of mutating ledger operations.
//!
//! # Invariants
//! - `operation()` names are part of the command-log format and never change.
//! - Every variant carries only string arguments.

/// One mutating ledger call, as recorded in and replayed from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    AddPerson { name: String },
    RepresentFlat { flat: String, person: String },
    RemoveFlatRepresentative { flat: String },
    RemovePerson { name: String },
}

impl Command {
    pub const ADD_PERSON: &'static str = "add_person";
    pub const REPRESENT_FLAT: &'static str = "represent_flat";
    pub const REMOVE_FLAT_REPRESENTATIVE: &'static str = "remove_flat_representative";
    pub const REMOVE_PERSON: &'static str = "remove_person";

    /// Stable operation name written to the log.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::AddPerson { .. } => Self::ADD_PERSON,
            Self::RepresentFlat { .. } => Self::REPRESENT_FLAT,
            Self::RemoveFlatRepresentative { .. } => Self::REMOVE_FLAT_REPRESENTATIVE,
            Self::RemovePerson { .. } => Self::REMOVE_PERSON,
        }
    }

    /// Positional arguments in log order.
    pub fn args(&self) -> Vec<&str> {
        match self {
            Self::AddPerson { name } | Self::RemovePerson { name } => vec![name.as_str()],
            Self::RepresentFlat { flat, person } => vec![flat.as_str(), person.as_str()],
            Self::RemoveFlatRepresentative { flat } => vec![flat.as_str()],
        }
    }

    /// Number of arguments `operation` takes, or `None` for unknown names.
    pub fn arity(operation: &str) -> Option<usize> {
        match operation {
            Self::ADD_PERSON | Self::REMOVE_FLAT_REPRESENTATIVE | Self::REMOVE_PERSON => Some(1),
            Self::REPRESENT_FLAT => Some(2),
            _ => None,
        }
    }

    /// Builds a command from its logged name and arguments.
    ///
    /// Returns `None` for unknown operations or a wrong argument count.
    pub fn from_parts(operation: &str, args: &[String]) -> Option<Self> {
        if Self::arity(operation)? != args.len() {
            return None;
        }
        let command = match operation {
            Self::ADD_PERSON => Self::AddPerson {
                name: args[0].clone(),
            },
            Self::REPRESENT_FLAT => Self::RepresentFlat {
                flat: args[0].clone(),
                person: args[1].clone(),
            },
            Self::REMOVE_FLAT_REPRESENTATIVE => Self::RemoveFlatRepresentative {
                flat: args[0].clone(),
            },
            Self::REMOVE_PERSON => Self::RemovePerson {
                name: args[0].clone(),
            },
            _ => return None,
        };
        Some(command)
    }
}
