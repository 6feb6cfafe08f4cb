//! Ownership unit model.
//!
//! # Responsibility
//! - Describe one flat: its share of the building and its legal owners.
//! - Record which present person currently represents it.
//!
//! # Invariants
//! - `represented` holds a person *name*, never an owned `Person`; the
//!   `Ledger` registry owns person lifetime and clears the link on removal.
//! - Only `Ledger` can change `represented`.

use super::fraction::{whole, Fraction};
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One (possibly joint) legal holder of a share of a flat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub name: String,
    /// Share relative to the flat, not to the building.
    pub fraction: Fraction,
}

impl Owner {
    pub fn new(name: impl Into<String>, fraction: Fraction) -> Self {
        Self {
            name: name.into(),
            fraction,
        }
    }

    /// Creates an owner holding the whole flat.
    pub fn sole(name: impl Into<String>) -> Self {
        Self::new(name, whole())
    }
}

/// Component of a flat's ordering key.
///
/// Numeric parts sort before textual ones so `"2"` < `"10"` < `"A"`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortPart {
    Number(u64),
    Text(String),
}

/// A unit of ownership within the building.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flat {
    /// Short name used on the command line, e.g. `"12"`.
    pub name: String,
    /// Name as recorded in the registry, e.g. `"774/12"`.
    pub original_name: String,
    /// Exact share of total building ownership.
    pub fraction: Fraction,
    pub owners: Vec<Owner>,
    /// Legal-owner person names, with joint entries expanded.
    pub persons: BTreeSet<String>,
    represented: Option<String>,
}

impl Flat {
    /// Creates an unrepresented flat whose original name equals `name`.
    pub fn new(
        name: impl Into<String>,
        fraction: Fraction,
        owners: Vec<Owner>,
        persons: BTreeSet<String>,
    ) -> Self {
        let name = name.into();
        Self {
            original_name: name.clone(),
            name,
            fraction,
            owners,
            persons,
            represented: None,
        }
    }

    /// Name of the current representative, if any.
    pub fn representative(&self) -> Option<&str> {
        self.represented.as_deref()
    }

    pub fn is_represented(&self) -> bool {
        self.represented.is_some()
    }

    /// Flat name prefixed by `*` when represented, by a space otherwise.
    pub fn display_name(&self) -> String {
        let marker = if self.is_represented() { '*' } else { ' ' };
        format!("{marker}{}", self.name)
    }

    /// Ordering key: `/`-separated parts, compared numerically when possible.
    pub fn sort_key(&self) -> Vec<SortPart> {
        self.name
            .split('/')
            .map(|part| match part.trim().parse::<u64>() {
                Ok(number) => SortPart::Number(number),
                Err(_) => SortPart::Text(part.to_string()),
            })
            .collect()
    }

    pub(crate) fn set_represented(&mut self, person_name: Option<String>) {
        self.represented = person_name;
    }
}

/// Compares two flats by their numeric-aware sort key.
pub fn compare_flats(left: &Flat, right: &Flat) -> Ordering {
    left.sort_key().cmp(&right.sort_key())
}

#[cfg(test)]
mod tests {
    use super::{compare_flats, Flat, Owner, SortPart};
    use crate::model::fraction::parse_fraction;
    use std::collections::BTreeSet;

    fn flat(name: &str) -> Flat {
        Flat::new(name, parse_fraction("1/4").unwrap(), Vec::new(), BTreeSet::new())
    }

    #[test]
    fn new_flat_is_unrepresented() {
        let flat = Flat::new(
            "3",
            parse_fraction("1/3").unwrap(),
            vec![Owner::sole("Oldřich Starý")],
            BTreeSet::from(["Oldřich Starý".to_string()]),
        );

        assert!(!flat.is_represented());
        assert_eq!(flat.representative(), None);
        assert_eq!(flat.original_name, "3");
        assert_eq!(flat.display_name(), " 3");
        assert_eq!(flat.owners[0].fraction, parse_fraction("1").unwrap());
    }

    #[test]
    fn display_name_marks_represented_flats() {
        let mut flat = flat("7");
        flat.set_represented(Some("Petr Novák".to_string()));
        assert_eq!(flat.display_name(), "*7");
        assert_eq!(flat.representative(), Some("Petr Novák"));
    }

    #[test]
    fn sort_key_compares_numbers_numerically() {
        let mut flats = vec![flat("10"), flat("2/1"), flat("2"), flat("A"), flat("2/10")];
        flats.sort_by(compare_flats);
        let names: Vec<&str> = flats.iter().map(|flat| flat.name.as_str()).collect();
        assert_eq!(names, vec!["2", "2/1", "2/10", "10", "A"]);
        assert_eq!(
            flat("774/12").sort_key(),
            vec![SortPart::Number(774), SortPart::Number(12)]
        );
    }
}
