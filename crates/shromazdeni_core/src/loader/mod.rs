//! Initial ownership dataset loading.
//!
//! # Responsibility
//! - Parse the registry JSON into `Flat` records with exact fractions.
//! - Expand joint-ownership owner entries into individual person names.
//!
//! # Invariants
//! - Output flats are ordered by their numeric-aware sort key.
//! - Ownership fractions are not checked to sum to one.

mod dataset;

pub use dataset::{
    load_flats, load_flats_from_path, load_flats_from_reader, owner_person_names, LoadError,
    LoadResult, JOINT_OWNERSHIP_MARKER,
};
