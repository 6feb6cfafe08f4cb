//! Meeting ledger: flats, present persons and who represents what.

use super::command::Command;
use super::error::{LedgerError, LedgerResult};
use crate::model::flat::Flat;
use crate::model::fraction::{format_decimal, Fraction};
use crate::model::person::Person;
use log::debug;
use num_traits::Zero;
use std::collections::{BTreeMap, HashMap};

const QUORUM_PERCENT: i64 = 50;

/// Aggregate root holding flats and present persons.
#[derive(Debug, Clone)]
pub struct Ledger {
    flats: Vec<Flat>,
    flat_index: HashMap<String, usize>,
    persons: BTreeMap<String, Person>,
}

impl Ledger {
    /// Creates a ledger with every flat unrepresented.
    ///
    /// Iteration order follows `flats`; a repeated flat name keeps its first
    /// occurrence.
    pub fn new(flats: Vec<Flat>) -> Self {
        let mut kept = Vec::with_capacity(flats.len());
        let mut flat_index = HashMap::with_capacity(flats.len());
        for mut flat in flats {
            if flat_index.contains_key(&flat.name) {
                continue;
            }
            flat.set_represented(None);
            flat_index.insert(flat.name.clone(), kept.len());
            kept.push(flat);
        }

        Self {
            flats: kept,
            flat_index,
            persons: BTreeMap::new(),
        }
    }

    /// Flats in iteration order.
    pub fn flats(&self) -> impl Iterator<Item = &Flat> {
        self.flats.iter()
    }

    pub fn get_flat(&self, name: &str) -> LedgerResult<&Flat> {
        self.flat_index
            .get(name)
            .map(|&index| &self.flats[index])
            .ok_or_else(|| LedgerError::FlatNotFound(name.to_string()))
    }

    /// Flat names starting with `prefix`, in iteration order.
    pub fn flat_names(&self, prefix: &str) -> Vec<String> {
        self.flats
            .iter()
            .filter(|flat| flat.name.starts_with(prefix))
            .map(|flat| flat.name.clone())
            .collect()
    }

    /// Resolves a flat's representative through the person registry.
    pub fn representative(&self, flat_name: &str) -> LedgerResult<Option<&Person>> {
        let flat = self.get_flat(flat_name)?;
        Ok(flat
            .representative()
            .and_then(|person_name| self.persons.get(person_name)))
    }

    /// Exact percentage of building ownership currently represented.
    pub fn percent_represented(&self) -> Fraction {
        let represented = self
            .flats
            .iter()
            .filter(|flat| flat.is_represented())
            .fold(Fraction::zero(), |sum, flat| sum + &flat.fraction);
        represented * Fraction::from_integer(100.into())
    }

    /// Whether strictly more than half of the ownership is represented.
    pub fn quorum_reached(&self) -> bool {
        self.percent_represented() > Fraction::from_integer(QUORUM_PERCENT.into())
    }

    pub fn person_exists(&self, name: &str) -> bool {
        self.persons.contains_key(name)
    }

    pub fn person(&self, name: &str) -> LedgerResult<&Person> {
        self.persons
            .get(name)
            .ok_or_else(|| LedgerError::PersonNotFound(name.to_string()))
    }

    /// Present persons ordered by name.
    pub fn persons(&self) -> impl Iterator<Item = &Person> {
        self.persons.values()
    }

    /// Registers a newly arrived person.
    pub fn add_person(&mut self, name: &str) -> LedgerResult<()> {
        if self.person_exists(name) {
            return Err(LedgerError::PersonAlreadyExists(name.to_string()));
        }
        self.persons.insert(name.to_string(), Person::new(name));
        debug!("event=ledger_mutation module=ledger op=add_person status=ok");
        Ok(())
    }

    /// Makes a present person the representative of a flat.
    ///
    /// Any previous representative is replaced silently; asking for
    /// confirmation is up to the caller.
    pub fn represent_flat(&mut self, flat_name: &str, person_name: &str) -> LedgerResult<()> {
        if !self.person_exists(person_name) {
            return Err(LedgerError::PersonNotFound(person_name.to_string()));
        }
        let flat = self.flat_mut(flat_name)?;
        flat.set_represented(Some(person_name.to_string()));
        debug!("event=ledger_mutation module=ledger op=represent_flat status=ok");
        Ok(())
    }

    /// Clears a flat's representative; a no-op when it has none.
    pub fn remove_flat_representative(&mut self, flat_name: &str) -> LedgerResult<()> {
        let flat = self.flat_mut(flat_name)?;
        let had_representative = flat.is_represented();
        flat.set_represented(None);
        debug!(
            "event=ledger_mutation module=ledger op=remove_flat_representative status=ok changed={had_representative}"
        );
        Ok(())
    }

    /// Removes a person and unrepresents every flat they represented.
    ///
    /// Returns the affected flat names in iteration order.
    pub fn remove_person(&mut self, name: &str) -> LedgerResult<Vec<String>> {
        if !self.person_exists(name) {
            return Err(LedgerError::PersonNotFound(name.to_string()));
        }

        let released = self.get_representative_flats(name);
        for flat in self
            .flats
            .iter_mut()
            .filter(|flat| flat.representative() == Some(name))
        {
            flat.set_represented(None);
        }
        self.persons.remove(name);
        debug!(
            "event=ledger_mutation module=ledger op=remove_person status=ok released={}",
            released.len()
        );
        Ok(released)
    }

    /// Flats currently represented by `person_name`, in iteration order.
    pub fn get_representative_flats(&self, person_name: &str) -> Vec<String> {
        self.flats
            .iter()
            .filter(|flat| flat.representative() == Some(person_name))
            .map(|flat| flat.name.clone())
            .collect()
    }

    /// Present person names starting with `prefix`, sorted.
    pub fn get_person_names(&self, prefix: &str) -> Vec<String> {
        self.persons
            .keys()
            .filter(|name| name.starts_with(prefix))
            .cloned()
            .collect()
    }

    /// Unrepresented flats the person co-owns, sorted by name.
    pub fn get_other_representatives(&self, person_name: &str) -> Vec<String> {
        let mut names: Vec<String> = self
            .flats
            .iter()
            .filter(|flat| !flat.is_represented() && flat.persons.contains(person_name))
            .map(|flat| flat.name.clone())
            .collect();
        names.sort();
        names
    }

    /// Applies one mutating command.
    ///
    /// Returns the flats released by `RemovePerson`, an empty list otherwise.
    pub fn apply(&mut self, command: &Command) -> LedgerResult<Vec<String>> {
        match command {
            Command::AddPerson { name } => self.add_person(name).map(|()| Vec::new()),
            Command::RepresentFlat { flat, person } => {
                self.represent_flat(flat, person).map(|()| Vec::new())
            }
            Command::RemoveFlatRepresentative { flat } => {
                self.remove_flat_representative(flat).map(|()| Vec::new())
            }
            Command::RemovePerson { name } => self.remove_person(name),
        }
    }

    fn flat_mut(&mut self, name: &str) -> LedgerResult<&mut Flat> {
        let index = *self
            .flat_index
            .get(name)
            .ok_or_else(|| LedgerError::FlatNotFound(name.to_string()))?;
        Ok(&mut self.flats[index])
    }
}

/// Renders a percentage for display, e.g. `33.33`.
pub fn format_percent(percent: &Fraction, decimals: u32) -> String {
    format_decimal(percent, decimals)
}

#[cfg(test)]
mod tests {
    use super::{format_percent, Ledger};
    use crate::ledger::{Command, LedgerError};
    use crate::model::flat::{Flat, Owner};
    use crate::model::fraction::{parse_fraction, Fraction};
    use num_traits::Zero;
    use std::collections::BTreeSet;

    fn flat(name: &str, fraction: &str, owners: &[&str]) -> Flat {
        Flat::new(
            name,
            parse_fraction(fraction).unwrap(),
            owners.iter().map(|owner| Owner::sole(*owner)).collect(),
            owners.iter().map(|owner| owner.to_string()).collect::<BTreeSet<_>>(),
        )
    }

    fn thirds() -> Ledger {
        Ledger::new(vec![
            flat("1", "1/3", &["Petr Novák"]),
            flat("2", "1/3", &["Jana Nová"]),
            flat("3", "1/3", &["Oldřich Starý"]),
        ])
    }

    #[test]
    fn percent_is_exact_for_thirds() {
        let mut ledger = thirds();
        ledger.add_person("X").unwrap();
        ledger.represent_flat("3", "X").unwrap();

        assert_eq!(ledger.percent_represented(), parse_fraction("100/3").unwrap());
        assert_eq!(format_percent(&ledger.percent_represented(), 2), "33.33");
        assert!(!ledger.quorum_reached());

        ledger.represent_flat("1", "X").unwrap();
        ledger.represent_flat("2", "X").unwrap();
        assert_eq!(ledger.percent_represented(), parse_fraction("100").unwrap());
        assert!(ledger.quorum_reached());

        assert_eq!(ledger.remove_person("X").unwrap(), vec!["1", "2", "3"]);
        assert!(ledger.percent_represented().is_zero());
    }

    #[test]
    fn exactly_half_is_not_a_quorum() {
        let mut ledger = Ledger::new(vec![flat("1", "1/2", &["A"]), flat("2", "1/2", &["B"])]);
        ledger.add_person("A").unwrap();
        ledger.represent_flat("1", "A").unwrap();
        assert_eq!(ledger.percent_represented(), Fraction::from_integer(50.into()));
        assert!(!ledger.quorum_reached());
    }

    #[test]
    fn add_person_rejects_duplicates() {
        let mut ledger = thirds();
        ledger.add_person("Jana Nová").unwrap();
        let err = ledger.add_person("Jana Nová").unwrap_err();
        assert_eq!(err, LedgerError::PersonAlreadyExists("Jana Nová".to_string()));
        assert!(!err.is_not_found());
    }

    #[test]
    fn represent_flat_requires_known_person_and_flat() {
        let mut ledger = thirds();
        let err = ledger.represent_flat("1", "Nobody").unwrap_err();
        assert_eq!(err, LedgerError::PersonNotFound("Nobody".to_string()));

        ledger.add_person("Petr Novák").unwrap();
        let err = ledger.represent_flat("99", "Petr Novák").unwrap_err();
        assert_eq!(err, LedgerError::FlatNotFound("99".to_string()));
        assert!(err.is_not_found());
        assert!(ledger.flats().all(|flat| !flat.is_represented()));
    }

    #[test]
    fn represent_flat_overwrites_previous_representative() {
        let mut ledger = thirds();
        ledger.add_person("A").unwrap();
        ledger.add_person("B").unwrap();
        ledger.represent_flat("1", "A").unwrap();
        ledger.represent_flat("1", "B").unwrap();

        assert_eq!(ledger.get_flat("1").unwrap().representative(), Some("B"));
        assert!(ledger.get_representative_flats("A").is_empty());
        assert_eq!(ledger.representative("1").unwrap().unwrap().name, "B");
    }

    #[test]
    fn remove_flat_representative_is_noop_when_unrepresented() {
        let mut ledger = thirds();
        ledger.remove_flat_representative("2").unwrap();
        assert!(!ledger.get_flat("2").unwrap().is_represented());
        assert!(matches!(
            ledger.remove_flat_representative("nope"),
            Err(LedgerError::FlatNotFound(_))
        ));
    }

    #[test]
    fn remove_person_unknown_fails_without_changes() {
        let mut ledger = thirds();
        ledger.add_person("A").unwrap();
        ledger.represent_flat("1", "A").unwrap();

        let err = ledger.remove_person("B").unwrap_err();
        assert_eq!(err, LedgerError::PersonNotFound("B".to_string()));
        assert_eq!(ledger.get_flat("1").unwrap().representative(), Some("A"));
    }

    #[test]
    fn person_names_filter_by_prefix() {
        let mut ledger = thirds();
        for name in ["Petr Novák", "Jana Nová", "Petra Malá"] {
            ledger.add_person(name).unwrap();
        }
        assert_eq!(ledger.get_person_names("Petr"), vec!["Petr Novák", "Petra Malá"]);
        assert_eq!(ledger.get_person_names("").len(), 3);
        assert!(ledger.get_person_names("petr").is_empty());
        assert_eq!(ledger.flat_names("2"), vec!["2"]);
    }

    #[test]
    fn apply_dispatches_each_command() {
        let mut ledger = thirds();
        let name = "Jana Nová".to_string();

        ledger.apply(&Command::AddPerson { name: name.clone() }).unwrap();
        ledger
            .apply(&Command::RepresentFlat {
                flat: "2".to_string(),
                person: name.clone(),
            })
            .unwrap();
        ledger
            .apply(&Command::RemoveFlatRepresentative {
                flat: "1".to_string(),
            })
            .unwrap();
        let released = ledger.apply(&Command::RemovePerson { name }).unwrap();

        assert_eq!(released, vec!["2"]);
        assert!(ledger.persons().next().is_none());
    }

    #[test]
    fn duplicate_flat_names_keep_first() {
        let ledger = Ledger::new(vec![flat("1", "1/2", &["A"]), flat("1", "1/3", &["B"])]);
        assert_eq!(ledger.flats().count(), 1);
        assert_eq!(ledger.get_flat("1").unwrap().fraction, parse_fraction("1/2").unwrap());
    }
}
