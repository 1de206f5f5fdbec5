// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the lattice on its own, without a scheduler.
//!
//! These drive the report/next interface the way the control loop does
//! and validate the properties a driver relies on:
//! - inference replaces direct tests wherever a witness allows it
//! - contradicting reports are rejected without corrupting state
//! - the suprema / infima sets are antichains at every step
//! - candidate selection works outward from the seeded boundary

use findbug::lattice::{
    Admission, Classification, Config, DirectionSet, Lattice, NextMove, Outcome,
};

fn cfg(s: &str) -> Config {
    s.parse().unwrap()
}

/// Drive the lattice to exhaustion against an oracle, returning how many
/// direct tests were needed.
fn drive(lattice: &mut Lattice, directions: DirectionSet, oracle: impl Fn(&Config) -> Outcome) -> usize {
    let mut tests = 0;
    while let Some(NextMove { candidate, .. }) = lattice.next(directions) {
        tests += 1;
        assert_eq!(
            lattice.classification_of(&candidate),
            Classification::Pending,
            "candidate {} must be pending once proposed",
            candidate
        );
        lattice.report(&candidate, oracle(&candidate)).unwrap();
    }
    lattice.finalize();
    tests
}

#[test]
fn test_minimal_witness_is_found_with_few_tests() {
    // True exactly on supersets of {A}; N = 4.
    let mut lattice = Lattice::new(4, false);
    lattice.report(&cfg("0000"), Outcome::False).unwrap();
    lattice.report(&cfg("1111"), Outcome::True).unwrap();

    let tests = drive(&mut lattice, DirectionSet::INFIMUM, |c| {
        if c.contains(0) {
            Outcome::True
        } else {
            Outcome::False
        }
    });

    let infima: Vec<String> = lattice.infima().iter().map(|c| c.to_string()).collect();
    assert_eq!(infima, vec!["1000"]);
    // Inference must have spared a meaningful part of the 16-element
    // powerset (14 are unseeded).
    assert!(tests < 14, "needed {} direct tests", tests);
}

#[test]
fn test_both_directions_converge() {
    // True exactly on supersets of {A, B}; N = 4.
    let mut lattice = Lattice::new(4, false);
    lattice.report(&cfg("0000"), Outcome::False).unwrap();
    lattice.report(&cfg("1111"), Outcome::True).unwrap();

    drive(&mut lattice, DirectionSet::BOTH, |c| {
        if c.contains(0) && c.contains(1) {
            Outcome::True
        } else {
            Outcome::False
        }
    });

    let infima: Vec<String> = lattice.infima().iter().map(|c| c.to_string()).collect();
    assert_eq!(infima, vec!["1100"]);

    // Maximal False subsets: drop A or drop B from the full set.
    let mut suprema: Vec<String> = lattice.suprema().iter().map(|c| c.to_string()).collect();
    suprema.sort();
    assert_eq!(suprema, vec!["0111", "1011"]);
}

#[test]
fn test_rejected_report_leaves_lattice_unchanged() {
    let mut lattice = Lattice::new(3, false);
    lattice.report(&cfg("100"), Outcome::True).unwrap();
    let before = lattice.summary();

    assert_eq!(
        lattice.report(&cfg("110"), Outcome::False).unwrap(),
        Admission::Rejected
    );
    assert_eq!(lattice.summary(), before);

    assert_eq!(
        lattice.report(&cfg("000"), Outcome::True).unwrap(),
        Admission::Accepted
    );
}

#[test]
fn test_improbable_gap_moves_the_frontier_past_it() {
    // True on supersets of {A}, but the direct test of {A} itself crashes.
    let mut lattice = Lattice::new(3, false);
    lattice.report(&cfg("000"), Outcome::False).unwrap();
    lattice.report(&cfg("111"), Outcome::True).unwrap();

    drive(&mut lattice, DirectionSet::INFIMUM, |c| {
        if c == &cfg("100") {
            Outcome::Improbable
        } else if c.contains(0) {
            Outcome::True
        } else {
            Outcome::False
        }
    });

    // 100 is improbable, so the minimal *witnessed* True configurations
    // are the two weight-2 supersets of {A}.
    let mut infima: Vec<String> = lattice.infima().iter().map(|c| c.to_string()).collect();
    infima.sort();
    assert_eq!(infima, vec!["101", "110"]);
}

#[test]
fn test_antichain_invariant_under_adversarial_order() {
    let mut lattice = Lattice::new(5, false);
    // Reports arrive in an order chosen to create and retire witnesses.
    let script = [
        ("00000", Outcome::False),
        ("11111", Outcome::True),
        ("11110", Outcome::True),
        ("11100", Outcome::True),
        ("00011", Outcome::False),
        ("00111", Outcome::Improbable),
        ("10000", Outcome::False),
        ("11000", Outcome::True),
        ("01000", Outcome::False),
    ];
    for (s, outcome) in script {
        let _ = lattice.report(&cfg(s), outcome).unwrap();
        for set in [lattice.suprema(), lattice.infima()] {
            let members: Vec<&Config> = set.iter().collect();
            for (i, a) in members.iter().enumerate() {
                for b in members.iter().skip(i + 1) {
                    assert!(
                        !a.covers(b) && !b.covers(a),
                        "frontier contains comparable pair {} / {}",
                        a,
                        b
                    );
                }
            }
        }
    }
    lattice.finalize();
    assert!(lattice.infima().contains(&cfg("11000")));
}

#[test]
fn test_next_move_cancellation_contract() {
    let mut lattice = Lattice::new(4, false);
    lattice.report(&cfg("0000"), Outcome::False).unwrap();
    lattice.report(&cfg("1111"), Outcome::True).unwrap();

    // Dispatch enough candidates to get a weight-2 configuration in
    // flight alongside the weight-1 ones.
    let mut pending = Vec::new();
    for _ in 0..5 {
        let mv = lattice.next(DirectionSet::INFIMUM).unwrap();
        assert!(mv.cancelled.is_empty());
        pending.push(mv.candidate);
    }
    assert!(pending.iter().any(|c| c.weight() == 2));

    // A weight-1 True witness implies every pending superset.
    lattice.report(&cfg("0001"), Outcome::True).unwrap();
    let mv = lattice.next(DirectionSet::INFIMUM).unwrap();
    assert!(!mv.cancelled.is_empty());
    for c in &mv.cancelled {
        assert!(pending.contains(c), "cancelled {} was never pending", c);
        assert!(
            c.covers(&cfg("0001")),
            "cancelled {} is not implied by the new witness",
            c
        );
        assert_ne!(lattice.classification_of(c), Classification::Pending);
    }
}
