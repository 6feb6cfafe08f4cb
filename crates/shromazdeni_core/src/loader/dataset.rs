//! JSON ownership dataset to sorted `Flat`s.

use crate::model::flat::{compare_flats, Flat, Owner};
use crate::model::fraction::{parse_fraction, whole, Fraction, FractionParseError};
use log::info;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Owner-name prefix marking a joint ownership of two spouses.
pub const JOINT_OWNERSHIP_MARKER: &str = "SJM";

static JOINT_OWNER_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^SJM\s*(?P<first>[^,]+?) a (?P<second>[^,]+?),\s*(?P<address>.+)$")
        .expect("valid joint owner regex")
});

pub type LoadResult<T> = Result<T, LoadError>;

#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Json(serde_json::Error),
    InvalidFraction {
        record: String,
        source: FractionParseError,
    },
    /// Joint-ownership entry not in the `SJM <a> a <b>, <address>` shape.
    InvalidOwnerName(String),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "{err}"),
            Self::Json(err) => write!(f, "invalid flats json: {err}"),
            Self::InvalidFraction { record, source } => write!(f, "{record}: {source}"),
            Self::InvalidOwnerName(name) => write!(f, "invalid joint owner entry: `{name}`"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Json(err) => Some(err),
            Self::InvalidFraction { source, .. } => Some(source),
            Self::InvalidOwnerName(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<serde_json::Error> for LoadError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

#[derive(Debug, Deserialize)]
struct FlatRecord {
    name: String,
    fraction: String,
    #[serde(default)]
    owners: Vec<OwnerRecord>,
}

#[derive(Debug, Deserialize)]
struct OwnerRecord {
    name: String,
    /// Missing share means the owner holds the whole flat.
    fraction: Option<String>,
}

/// Parses flats from dataset JSON text.
pub fn load_flats(json: &str) -> LoadResult<Vec<Flat>> {
    let records: Vec<FlatRecord> = serde_json::from_str(json)?;
    convert_records(records)
}

pub fn load_flats_from_reader<R: Read>(reader: R) -> LoadResult<Vec<Flat>> {
    let records: Vec<FlatRecord> = serde_json::from_reader(reader)?;
    convert_records(records)
}

pub fn load_flats_from_path(path: impl AsRef<Path>) -> LoadResult<Vec<Flat>> {
    let file = File::open(path)?;
    load_flats_from_reader(BufReader::new(file))
}

/// Person names behind one owner entry.
///
/// `"SJM Jan Novák a Eva Nováková, Praha 1"` yields
/// `["Jan Novák, Praha 1", "Eva Nováková, Praha 1"]`; other names yield
/// themselves.
pub fn owner_person_names(owner_name: &str) -> LoadResult<Vec<String>> {
    if !owner_name.starts_with(JOINT_OWNERSHIP_MARKER) {
        return Ok(vec![owner_name.to_string()]);
    }

    let captures = JOINT_OWNER_RE
        .captures(owner_name.trim())
        .ok_or_else(|| LoadError::InvalidOwnerName(owner_name.to_string()))?;
    // Exactly two names; a third co-owner would otherwise stick to the second.
    if captures["second"].contains(" a ") {
        return Err(LoadError::InvalidOwnerName(owner_name.to_string()));
    }
    let address = captures["address"].trim();
    Ok(vec![
        format!("{}, {address}", captures["first"].trim()),
        format!("{}, {address}", captures["second"].trim()),
    ])
}

fn convert_records(records: Vec<FlatRecord>) -> LoadResult<Vec<Flat>> {
    let prefixes: BTreeSet<Option<&str>> = records
        .iter()
        .map(|record| record.name.split_once('/').map(|(prefix, _)| prefix))
        .collect();
    let shorten = prefixes.len() == 1 && !prefixes.contains(&None);

    let mut flats = records
        .iter()
        .map(|record| convert_flat(record, shorten))
        .collect::<LoadResult<Vec<_>>>()?;
    flats.sort_by(compare_flats);

    info!(
        "event=dataset_load module=loader status=ok flats={} shortened={}",
        flats.len(),
        shorten
    );
    Ok(flats)
}

fn convert_flat(record: &FlatRecord, shorten: bool) -> LoadResult<Flat> {
    let fraction = parse_record_fraction(&record.name, &record.fraction)?;

    let mut owners = Vec::with_capacity(record.owners.len());
    let mut persons = BTreeSet::new();
    for owner in &record.owners {
        let owner_fraction = match owner.fraction.as_deref() {
            Some(text) => parse_record_fraction(&owner.name, text)?,
            None => whole(),
        };
        persons.extend(owner_person_names(&owner.name)?);
        owners.push(Owner::new(owner.name.clone(), owner_fraction));
    }

    let short_name = match record.name.split_once('/') {
        Some((_, rest)) if shorten => rest,
        _ => record.name.as_str(),
    };
    let mut flat = Flat::new(short_name, fraction, owners, persons);
    flat.original_name = record.name.clone();
    Ok(flat)
}

fn parse_record_fraction(record: &str, text: &str) -> LoadResult<Fraction> {
    parse_fraction(text).map_err(|source| LoadError::InvalidFraction {
        record: record.to_string(),
        source,
    })
}
