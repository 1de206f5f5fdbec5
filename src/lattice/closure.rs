// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Witness sets and the monotone closure they generate.
//!
//! Under the monotonicity assumption a single tested configuration decides
//! an entire region of the lattice: a True result at `t` implies True for
//! every superset of `t`, and a False result at `f` implies False for every
//! subset of `f`. A [`WitnessSet`] stores only the generators of such a
//! region and answers implication queries against them.
//!
//! The upward set keeps the minimal True witnesses, the downward set the
//! maximal False witnesses. Inserting a new witness prunes members it
//! dominates, so each set stays an antichain while the region it generates
//! only ever grows.

use crate::lattice::Config;
use indexmap::IndexSet;

/// Which closure a witness set generates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    /// Generators of an upward-closed region (True side): a configuration
    /// is implied when it covers some member.
    Upward,
    /// Generators of a downward-closed region (False side): a configuration
    /// is implied when some member covers it.
    Downward,
}

/// Result of inserting a witness.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Insertion {
    /// The witness extended the region. Members it made redundant were
    /// removed and are returned so the caller can retire them elsewhere.
    Extended { pruned: Vec<Config> },
    /// The witness was already implied by an existing member; the set is
    /// unchanged.
    AlreadyImplied,
}

/// An antichain of extremal witnesses generating a monotone region.
#[derive(Debug, Clone)]
pub struct WitnessSet {
    orientation: Orientation,
    members: IndexSet<Config>,
}

impl WitnessSet {
    pub fn new(orientation: Orientation) -> Self {
        Self {
            orientation,
            members: IndexSet::new(),
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Is `config` inside the generated region?
    pub fn implies(&self, config: &Config) -> bool {
        match self.orientation {
            Orientation::Upward => self.members.iter().any(|w| config.covers(w)),
            Orientation::Downward => self.members.iter().any(|w| w.covers(config)),
        }
    }

    /// Exact membership in the generator antichain (not implication).
    pub fn contains(&self, config: &Config) -> bool {
        self.members.contains(config)
    }

    /// Insert a witness, pruning members the new one makes redundant.
    pub fn insert(&mut self, config: Config) -> Insertion {
        if self.implies(&config) {
            return Insertion::AlreadyImplied;
        }
        let dominated: Vec<Config> = match self.orientation {
            Orientation::Upward => self
                .members
                .iter()
                .filter(|w| w.covers(&config))
                .cloned()
                .collect(),
            Orientation::Downward => self
                .members
                .iter()
                .filter(|w| config.covers(w))
                .cloned()
                .collect(),
        };
        for w in &dominated {
            self.members.shift_remove(w);
        }
        self.members.insert(config);
        Insertion::Extended { pruned: dominated }
    }

    /// The extremal witness weight: minimum for the upward set, maximum
    /// for the downward set. `None` while the set is empty.
    pub fn best_weight(&self) -> Option<usize> {
        let weights = self.members.iter().map(|w| w.weight());
        match self.orientation {
            Orientation::Upward => weights.min(),
            Orientation::Downward => weights.max(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Config> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}
