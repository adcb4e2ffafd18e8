use bingo_rs::roster::{Roster, RosterError};
use bingo_rs::settings::Settings;

#[test]
fn ids_are_strictly_increasing_across_adds_and_removes() {
    let settings = Settings::default();
    let mut roster = Roster::new();
    let mut seen = Vec::new();

    for i in 0..5 {
        let id = roster.add(&format!("P{i}"), 0.0, &settings).unwrap();
        assert!(seen.last().map_or(true, |&last| id > last));
        seen.push(id);
    }
    // Remove from the middle and the tail; neither id may come back.
    roster.remove(3).unwrap();
    roster.remove(5).unwrap();
    let id = roster.add("again", 0.0, &settings).unwrap();
    assert_eq!(id, 6);
    assert!(roster.find(3).is_none());
    assert!(roster.find(5).is_none());
}

#[test]
fn removal_compacts_but_keeps_relative_order() {
    let settings = Settings::default();
    let mut roster = Roster::new();
    for name in ["a", "b", "c", "d"] {
        roster.add(name, 0.0, &settings).unwrap();
    }
    roster.remove(2).unwrap();
    let names: Vec<&str> = roster.players().iter().map(|p| p.name()).collect();
    assert_eq!(names, vec!["a", "c", "d"]);
}

#[test]
fn capacity_uses_the_configured_maximum() {
    let mut settings = Settings::default();
    settings.set_max_players(3);
    let mut roster = Roster::new();
    for i in 0..3 {
        roster.add(&format!("P{i}"), 0.0, &settings).unwrap();
    }
    assert_eq!(
        roster.add("overflow", 0.0, &settings),
        Err(RosterError::CapacityReached { max: 3 })
    );
    // Raising the limit at runtime opens the door again.
    settings.set_max_players(4);
    assert!(roster.add("fits", 0.0, &settings).is_ok());
}
