use num_traits::Zero;
use shromazdeni_core::{format_percent, parse_fraction, Flat, Ledger, LedgerError, Owner};
use std::collections::BTreeSet;

fn flat(name: &str, fraction: &str, owners: &[&str]) -> Flat {
    Flat::new(
        name,
        parse_fraction(fraction).unwrap(),
        owners.iter().map(|owner| Owner::sole(*owner)).collect(),
        owners
            .iter()
            .map(|owner| owner.to_string())
            .collect::<BTreeSet<_>>(),
    )
}

fn three_thirds() -> Ledger {
    Ledger::new(vec![
        flat("1", "1/3", &["Petr Novák"]),
        flat("2", "1/3", &["Jana Nová"]),
        flat("3", "1/3", &["Oldřich Starý"]),
    ])
}

#[test]
fn thirds_scenario_reaches_and_drops_representation() {
    let mut ledger = three_thirds();
    assert!(ledger.percent_represented().is_zero());

    ledger.add_person("X").unwrap();
    ledger.represent_flat("3", "X").unwrap();
    assert_eq!(
        ledger.percent_represented(),
        parse_fraction("100/3").unwrap()
    );
    assert_eq!(format_percent(&ledger.percent_represented(), 2), "33.33");

    ledger.remove_person("X").unwrap();
    assert!(ledger.percent_represented().is_zero());
}

#[test]
fn represent_flat_is_visible_through_get_flat() {
    let mut ledger = three_thirds();
    ledger.add_person("Radoslava Květná").unwrap();
    ledger.represent_flat("2", "Radoslava Květná").unwrap();

    let flat = ledger.get_flat("2").unwrap();
    assert_eq!(flat.representative(), Some("Radoslava Květná"));
    assert_eq!(
        ledger.representative("2").unwrap().map(|person| person.name.as_str()),
        Some("Radoslava Květná")
    );
}

#[test]
fn remove_person_releases_flats_in_iteration_order() {
    let mut ledger = Ledger::new(vec![
        flat("A", "1/3", &["Owner A"]),
        flat("B", "1/3", &["Owner B"]),
        flat("C", "1/3", &["Owner C"]),
    ]);
    ledger.add_person("P").unwrap();
    ledger.represent_flat("B", "P").unwrap();
    ledger.represent_flat("A", "P").unwrap();

    let released = ledger.remove_person("P").unwrap();

    assert_eq!(released, vec!["A", "B"]);
    assert!(!ledger.get_flat("A").unwrap().is_represented());
    assert!(!ledger.get_flat("B").unwrap().is_represented());
    assert!(!ledger.person_exists("P"));
}

#[test]
fn co_owner_is_offered_unrepresented_flats() {
    let mut ledger = Ledger::new(vec![
        flat("1", "1/2", &["Petr"]),
        flat("2", "1/2", &["Petr", "Jana"]),
    ]);
    ledger.add_person("Petr").unwrap();
    ledger.represent_flat("1", "Petr").unwrap();

    assert_eq!(ledger.get_other_representatives("Petr"), vec!["2"]);
    assert_eq!(ledger.get_other_representatives("Jana"), vec!["2"]);

    ledger.represent_flat("2", "Petr").unwrap();
    assert!(ledger.get_other_representatives("Petr").is_empty());
    assert!(ledger.quorum_reached());
}

#[test]
fn unknown_names_report_not_found() {
    let mut ledger = three_thirds();

    let err = ledger.get_flat("42").unwrap_err();
    assert_eq!(err, LedgerError::FlatNotFound("42".to_string()));
    assert!(ledger.remove_person("Nobody").unwrap_err().is_not_found());
    assert!(ledger.represent_flat("1", "Nobody").unwrap_err().is_not_found());
    assert!(ledger.person("Nobody").is_err());
}

#[test]
fn many_small_shares_sum_exactly() {
    let flats = (1..=300)
        .map(|index| flat(&index.to_string(), "1/300", &[]))
        .collect();
    let mut ledger = Ledger::new(flats);
    ledger.add_person("Proxy").unwrap();
    for index in 1..=151 {
        ledger.represent_flat(&index.to_string(), "Proxy").unwrap();
    }

    assert_eq!(
        ledger.percent_represented(),
        parse_fraction("151/3").unwrap()
    );
    assert!(ledger.quorum_reached());
    assert_eq!(format_percent(&ledger.percent_represented(), 1), "50.3");
}
