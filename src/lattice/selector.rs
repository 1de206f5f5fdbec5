// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Candidate selection: which configuration to execute next.
//!
//! Each search direction keeps a priority heap of candidates harvested
//! from the boundary of the known regions: immediate neighbors of fresh
//! witnesses, meets of True witnesses, joins of False witnesses, and
//! penalized neighbors of improbable outcomes. The infimum direction
//! prefers the lightest candidate, the supremum direction the heaviest,
//! so each search probes the far side of the unresolved gap and a single
//! conclusive answer cuts the largest possible region.
//!
//! When a heap runs dry the selector falls back to a plain breadth-first
//! sweep over Hamming-weight levels (ascending for the infimum search,
//! descending for the supremum search). The sweep restarts whenever new
//! knowledge arrives and guarantees that every unresolved configuration is
//! eventually proposed, which the exhaustive mode relies on.
//!
//! Candidates are filtered lazily: a popped entry that has become implied,
//! improbable or pending since it was pushed is simply discarded.

use crate::lattice::store::LatticeStore;
use crate::lattice::{Classification, Config};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// One search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Grow the False region upward toward the largest False witnesses.
    Supremum,
    /// Shrink the True region downward toward the smallest True witnesses.
    Infimum,
}

/// Which frontiers the driver asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DirectionSet {
    pub supremum: bool,
    pub infimum: bool,
}

impl DirectionSet {
    pub const SUPREMUM: DirectionSet = DirectionSet {
        supremum: true,
        infimum: false,
    };
    pub const INFIMUM: DirectionSet = DirectionSet {
        supremum: false,
        infimum: true,
    };
    pub const BOTH: DirectionSet = DirectionSet {
        supremum: true,
        infimum: true,
    };

    pub fn any(self) -> bool {
        self.supremum || self.infimum
    }
}

/// Heap entry: larger score pops first; ties break on the bit pattern so
/// selection is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Scored {
    score: i64,
    config: Config,
}

impl Ord for Scored {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .cmp(&other.score)
            .then_with(|| self.config.cmp_bits(&other.config))
    }
}

impl PartialOrd for Scored {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Per-direction heap plus the breadth-first fallback cursor.
#[derive(Debug)]
struct DirectionState {
    direction: Direction,
    heap: BinaryHeap<Scored>,
    /// Remaining sweep levels, last element is the next to visit.
    sweep: Vec<usize>,
}

impl DirectionState {
    fn new(direction: Direction, width: usize) -> Self {
        let mut state = Self {
            direction,
            heap: BinaryHeap::new(),
            sweep: Vec::new(),
        };
        state.reset_sweep(width);
        state
    }

    fn reset_sweep(&mut self, width: usize) {
        self.sweep = match self.direction {
            // Stored reversed so pop() yields levels in search order.
            Direction::Infimum => (0..=width).rev().collect(),
            Direction::Supremum => (0..=width).collect(),
        };
    }

    fn score(&self, config: &Config, bonus: i64) -> i64 {
        let width = config.width() as i64;
        let weight = config.weight() as i64;
        match self.direction {
            Direction::Infimum => width - weight + bonus,
            Direction::Supremum => weight + bonus,
        }
    }

    fn push(&mut self, config: Config, bonus: i64) {
        let score = self.score(&config, bonus);
        self.heap.push(Scored { score, config });
    }
}

/// Chooses the next configuration to execute for each requested direction.
#[derive(Debug)]
pub struct CandidateSelector {
    width: usize,
    require_at_least_one: bool,
    supremum: DirectionState,
    infimum: DirectionState,
    /// Alternation toggle used when both directions are requested.
    next_is_infimum: bool,
}

impl CandidateSelector {
    pub fn new(width: usize, require_at_least_one: bool) -> Self {
        Self {
            width,
            require_at_least_one,
            supremum: DirectionState::new(Direction::Supremum, width),
            infimum: DirectionState::new(Direction::Infimum, width),
            next_is_infimum: false,
        }
    }

    /// Harvest candidates around a fresh True witness.
    pub fn observe_true(&mut self, witness: &Config, store: &LatticeStore) {
        let mut total_meet = witness.clone();
        let mut meets = Vec::new();
        for other in store.trues().iter() {
            if other == witness {
                continue;
            }
            meets.push(witness.meet(other));
            total_meet = total_meet.meet(other);
        }
        for m in meets {
            self.push_unresolved(Direction::Infimum, m, 0, store);
        }
        self.push_unresolved(Direction::Infimum, total_meet, 0, store);
        for down in witness.downs() {
            self.push_unresolved(Direction::Infimum, down.clone(), 0, store);
            self.push_unresolved(Direction::Supremum, down, 0, store);
        }
        self.knowledge_changed();
    }

    /// Harvest candidates around a fresh False witness.
    pub fn observe_false(&mut self, witness: &Config, store: &LatticeStore) {
        let mut total_join = witness.clone();
        let mut joins = Vec::new();
        for other in store.falses().iter() {
            if other == witness {
                continue;
            }
            joins.push(witness.join(other));
            total_join = total_join.join(other);
        }
        for j in joins {
            self.push_unresolved(Direction::Supremum, j, 0, store);
        }
        self.push_unresolved(Direction::Supremum, total_join, 0, store);
        for up in witness.ups() {
            self.push_unresolved(Direction::Supremum, up.clone(), 0, store);
            self.push_unresolved(Direction::Infimum, up, 0, store);
        }
        self.knowledge_changed();
    }

    /// Harvest penalized candidates around an improbable outcome. The
    /// penalty keeps the search from clustering around a configuration
    /// that yields no information.
    pub fn observe_improbable(&mut self, config: &Config, store: &LatticeStore) {
        let width = config.width() as i64;
        let weight = config.weight() as i64;
        let down_bonus = -((width - weight) / 2 + 1);
        let up_bonus = -(weight / 2 + 1);
        for down in config.downs() {
            self.push_unresolved(Direction::Infimum, down, down_bonus, store);
        }
        for up in config.ups() {
            self.push_unresolved(Direction::Supremum, up, up_bonus, store);
        }
        self.knowledge_changed();
    }

    /// The next configuration worth executing, or `None` when everything
    /// is resolved or inferable. Alternates directions per call when both
    /// are requested so neither search starves the other.
    pub fn next(&mut self, directions: DirectionSet, store: &LatticeStore) -> Option<Config> {
        if !directions.any() {
            return None;
        }
        let both = directions.supremum && directions.infimum;
        for _ in 0..2 {
            let direction = if both {
                self.next_is_infimum = !self.next_is_infimum;
                if self.next_is_infimum {
                    Direction::Infimum
                } else {
                    Direction::Supremum
                }
            } else if directions.infimum {
                Direction::Infimum
            } else {
                Direction::Supremum
            };
            if let Some(candidate) = self.next_in(direction, store) {
                return Some(candidate);
            }
            if !both {
                break;
            }
        }
        None
    }

    fn next_in(&mut self, direction: Direction, store: &LatticeStore) -> Option<Config> {
        loop {
            let popped = self.state_mut(direction).heap.pop();
            match popped {
                Some(scored) => {
                    if self.viable(&scored.config, store) {
                        return Some(scored.config);
                    }
                }
                None => {
                    if !self.refill(direction, store) {
                        return None;
                    }
                }
            }
        }
    }

    /// Breadth-first fallback: push every unresolved configuration of the
    /// next non-empty Hamming-weight level. Returns false once the sweep
    /// is exhausted.
    fn refill(&mut self, direction: Direction, store: &LatticeStore) -> bool {
        let require_one = self.require_at_least_one;
        let width = self.width;
        loop {
            let state = self.state_mut(direction);
            let Some(level) = state.sweep.pop() else {
                return false;
            };
            let mut found = false;
            for config in LevelIter::new(width, level) {
                if require_one && config.is_empty() {
                    continue;
                }
                if store.classification_of(&config) != Classification::Unknown {
                    continue;
                }
                self.state_mut(direction).push(config, 0);
                found = true;
            }
            if found {
                return true;
            }
        }
    }

    fn push_unresolved(
        &mut self,
        direction: Direction,
        config: Config,
        bonus: i64,
        store: &LatticeStore,
    ) {
        if self.require_at_least_one && config.is_empty() {
            return;
        }
        if store.is_implied(&config) || store.improbable().contains(&config) {
            return;
        }
        self.state_mut(direction).push(config, bonus);
    }

    fn viable(&self, config: &Config, store: &LatticeStore) -> bool {
        if self.require_at_least_one && config.is_empty() {
            return false;
        }
        store.classification_of(config) == Classification::Unknown
    }

    fn knowledge_changed(&mut self) {
        let width = self.width;
        self.supremum.reset_sweep(width);
        self.infimum.reset_sweep(width);
    }

    fn state_mut(&mut self, direction: Direction) -> &mut DirectionState {
        match direction {
            Direction::Supremum => &mut self.supremum,
            Direction::Infimum => &mut self.infimum,
        }
    }
}

/// All configurations of a given Hamming weight, in ascending index order.
struct LevelIter {
    width: usize,
    positions: Vec<usize>,
    started: bool,
    done: bool,
}

impl LevelIter {
    fn new(width: usize, weight: usize) -> Self {
        Self {
            width,
            positions: (0..weight).collect(),
            started: false,
            done: weight > width,
        }
    }

    fn current(&self) -> Config {
        Config::from_indices(self.width, &self.positions)
    }
}

impl Iterator for LevelIter {
    type Item = Config;

    fn next(&mut self) -> Option<Config> {
        if self.done {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(self.current());
        }
        // Advance to the next index combination.
        let k = self.positions.len();
        let mut i = k;
        loop {
            if i == 0 {
                self.done = true;
                return None;
            }
            i -= 1;
            if self.positions[i] < self.width - k + i {
                break;
            }
        }
        self.positions[i] += 1;
        for j in i + 1..k {
            self.positions[j] = self.positions[j - 1] + 1;
        }
        Some(self.current())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::Outcome;

    fn cfg(s: &str) -> Config {
        s.parse().unwrap()
    }

    /// Classify through the store and mirror the observation into the
    /// selector, the way the lattice facade wires them together.
    fn feed(store: &mut LatticeStore, selector: &mut CandidateSelector, s: &str, outcome: Outcome) {
        let config = cfg(s);
        store.classify(&config, outcome).unwrap();
        match outcome {
            Outcome::True => selector.observe_true(&config, store),
            Outcome::False => selector.observe_false(&config, store),
            Outcome::Improbable => selector.observe_improbable(&config, store),
        }
    }

    #[test]
    fn test_level_iter() {
        let all: Vec<String> = LevelIter::new(4, 2).map(|c| c.to_string()).collect();
        assert_eq!(all.len(), 6);
        assert_eq!(all[0], "1100");
        assert_eq!(all[5], "0011");

        assert_eq!(LevelIter::new(3, 0).count(), 1);
        assert_eq!(LevelIter::new(3, 3).count(), 1);
        assert_eq!(LevelIter::new(3, 4).count(), 0);
    }

    #[test]
    fn test_seeded_search_probes_light_levels_first() {
        let mut store = LatticeStore::new(3);
        let mut selector = CandidateSelector::new(3, false);
        feed(&mut store, &mut selector, "000", Outcome::False);
        feed(&mut store, &mut selector, "111", Outcome::True);

        let candidate = selector.next(DirectionSet::INFIMUM, &store).unwrap();
        assert_eq!(candidate.weight(), 1, "got {}", candidate);
    }

    #[test]
    fn test_supremum_probes_heavy_levels_first() {
        let mut store = LatticeStore::new(3);
        let mut selector = CandidateSelector::new(3, false);
        feed(&mut store, &mut selector, "000", Outcome::False);
        feed(&mut store, &mut selector, "111", Outcome::True);

        let candidate = selector.next(DirectionSet::SUPREMUM, &store).unwrap();
        assert_eq!(candidate.weight(), 2, "got {}", candidate);
    }

    #[test]
    fn test_never_returns_resolved_or_pending() {
        let mut store = LatticeStore::new(3);
        let mut selector = CandidateSelector::new(3, false);
        feed(&mut store, &mut selector, "000", Outcome::False);
        feed(&mut store, &mut selector, "111", Outcome::True);

        let mut proposed = Vec::new();
        while let Some(c) = selector.next(DirectionSet::BOTH, &store) {
            assert_eq!(store.classification_of(&c), Classification::Unknown);
            store.mark_pending(c.clone());
            proposed.push(c);
        }
        // Everything unresolved was proposed exactly once: the six
        // configurations strictly between bottom and top.
        assert_eq!(proposed.len(), 6);
    }

    #[test]
    fn test_exhausted_when_all_resolved() {
        let mut store = LatticeStore::new(2);
        let mut selector = CandidateSelector::new(2, false);
        feed(&mut store, &mut selector, "11", Outcome::True);
        feed(&mut store, &mut selector, "10", Outcome::True);
        feed(&mut store, &mut selector, "01", Outcome::True);
        feed(&mut store, &mut selector, "00", Outcome::True);

        assert_eq!(selector.next(DirectionSet::BOTH, &store), None);
    }

    #[test]
    fn test_sweep_fallback_proposes_without_seeds() {
        let store = LatticeStore::new(2);
        let mut selector = CandidateSelector::new(2, false);
        // Nothing observed yet; the breadth-first sweep still produces a
        // candidate for each direction.
        let inf = selector.next(DirectionSet::INFIMUM, &store).unwrap();
        assert_eq!(inf, cfg("00"));

        let sup = selector.next(DirectionSet::SUPREMUM, &store).unwrap();
        assert_eq!(sup, cfg("11"));
    }

    #[test]
    fn test_require_at_least_one_excludes_bottom() {
        let mut store = LatticeStore::new(2);
        let mut selector = CandidateSelector::new(2, true);
        let mut seen = Vec::new();
        while let Some(c) = selector.next(DirectionSet::INFIMUM, &store) {
            assert!(!c.is_empty());
            store.mark_pending(c.clone());
            seen.push(c);
        }
        // Everything except the empty configuration.
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_alternation_when_both_requested() {
        let mut store = LatticeStore::new(4);
        let mut selector = CandidateSelector::new(4, false);
        feed(&mut store, &mut selector, "0000", Outcome::False);
        feed(&mut store, &mut selector, "1111", Outcome::True);

        let first = selector.next(DirectionSet::BOTH, &store).unwrap();
        store.mark_pending(first.clone());
        let second = selector.next(DirectionSet::BOTH, &store).unwrap();
        store.mark_pending(second.clone());

        // One probe per direction: a light one and a heavy one.
        let mut weights = vec![first.weight(), second.weight()];
        weights.sort_unstable();
        assert_eq!(weights, vec![1, 3]);
    }

    #[test]
    fn test_improbable_neighbors_are_penalized() {
        let mut store = LatticeStore::new(3);
        let mut selector = CandidateSelector::new(3, false);
        feed(&mut store, &mut selector, "000", Outcome::False);
        feed(&mut store, &mut selector, "111", Outcome::True);
        feed(&mut store, &mut selector, "100", Outcome::Improbable);

        // The improbable configuration is discarded when popped; the
        // remaining weight-1 candidates come out first.
        let candidate = selector.next(DirectionSet::INFIMUM, &store).unwrap();
        assert_eq!(candidate.weight(), 1);
        assert_ne!(candidate, cfg("100"));
    }
}
