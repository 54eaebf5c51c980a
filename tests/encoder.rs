mod common;

use std::collections::HashSet;

use castle_escape::{
    STATE_COUNT, encode,
    types::{GuardId, Health},
};
use common::obs;

#[test]
fn every_observation_maps_to_a_distinct_index() {
    let mut seen = HashSet::new();
    for row in 0..5 {
        for col in 0..5 {
            for health in [Health::Critical, Health::Injured, Health::Full] {
                let guards = std::iter::once(None).chain(GuardId::all().map(Some));
                for guard in guards {
                    let observation = castle_escape::Observation {
                        guard_in_cell: guard,
                        ..obs(row, col, health, None)
                    };
                    let index = encode(&observation);
                    assert!(index.value() < STATE_COUNT);
                    assert!(seen.insert(index), "duplicate index {index}");
                }
            }
        }
    }
    assert_eq!(seen.len(), 375);
}

#[test]
fn encoding_is_deterministic() {
    let observation = obs(3, 1, Health::Injured, Some("G2"));
    assert_eq!(encode(&observation), encode(&observation));
    assert_eq!(encode(&observation).value(), 3 * 75 + 15 + 5 + 2);
}

#[test]
fn documented_examples() {
    assert_eq!(encode(&obs(2, 3, Health::Injured, None)).value(), 200);
    assert_eq!(encode(&obs(0, 0, Health::Critical, None)).value(), 0);
    assert_eq!(encode(&obs(4, 4, Health::Full, Some("G4"))).value(), 374);
}

#[test]
fn guard_labels_outside_range_are_rejected() {
    assert!(GuardId::parse("G0").is_err());
    assert!(GuardId::parse("G5").is_err());
    assert!(GuardId::parse("guard").is_err());
    assert_eq!(GuardId::parse("G3").unwrap().code(), 3);
}
