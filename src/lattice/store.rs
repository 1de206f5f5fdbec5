// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The classification store: everything the search knows so far.
//!
//! The store owns the two witness antichains, the improbable record, the
//! pending set and the frontier. All mutation goes through
//! [`classify`](LatticeStore::classify), which enforces the permanence of
//! classifications: a report that contradicts an implied classification is
//! rejected and leaves the store untouched.

use crate::error::LatticeError;
use crate::lattice::closure::{Insertion, Orientation, WitnessSet};
use crate::lattice::frontier::Frontier;
use crate::lattice::{Admission, Classification, Config, Outcome};
use indexmap::IndexSet;
use serde::Serialize;
use tracing::debug;

/// Aggregate counts exposed to the driver, one field per line of the
/// summary a driver typically prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LatticeSummary {
    pub trues: usize,
    pub suprema: usize,
    pub improbable: usize,
    pub infima: usize,
    pub falses: usize,
    pub pending: usize,
    /// Weight of the smallest True witness, if any.
    pub best_true_weight: Option<usize>,
    /// Weight of the largest False witness, if any.
    pub best_false_weight: Option<usize>,
}

/// Classification state for every configuration seen so far, plus the
/// frontier derived from it.
#[derive(Debug)]
pub struct LatticeStore {
    width: usize,
    trues: WitnessSet,
    falses: WitnessSet,
    improbable: IndexSet<Config>,
    pending: IndexSet<Config>,
    frontier: Frontier,
}

impl LatticeStore {
    pub fn new(width: usize) -> Self {
        Self {
            width,
            trues: WitnessSet::new(Orientation::Upward),
            falses: WitnessSet::new(Orientation::Downward),
            improbable: IndexSet::new(),
            pending: IndexSet::new(),
            frontier: Frontier::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Record a terminal result for `config`.
    ///
    /// A matching pending entry is cleared regardless of the verdict: the
    /// execution is over either way. `Rejected` reports leave the witness
    /// sets, the improbable record and the frontier unchanged.
    pub fn classify(&mut self, config: &Config, outcome: Outcome) -> Result<Admission, LatticeError> {
        if config.width() != self.width {
            return Err(LatticeError::WidthMismatch {
                expected: self.width,
                got: config.width(),
            });
        }
        self.pending.shift_remove(config);
        match outcome {
            Outcome::True => self.classify_true(config),
            Outcome::False => self.classify_false(config),
            Outcome::Improbable => self.classify_improbable(config),
        }
    }

    fn classify_true(&mut self, config: &Config) -> Result<Admission, LatticeError> {
        if self.falses.implies(config) {
            return Ok(Admission::Rejected);
        }
        if self.improbable.contains(config) && !self.trues.implies(config) {
            // Improbable is terminal; a later conclusive report for the
            // same configuration is a contradiction, not an update.
            return Ok(Admission::Rejected);
        }
        match self.trues.insert(config.clone()) {
            Insertion::AlreadyImplied => {}
            Insertion::Extended { pruned } => {
                for retired in &pruned {
                    self.frontier.retire_infimum(retired);
                }
                self.frontier
                    .check_infimum(config, &self.falses, &self.improbable);
                for down in config.downs() {
                    if self.falses.contains(&down) {
                        self.frontier
                            .check_supremum(&down, &self.trues, &self.improbable);
                    }
                }
                debug!(config = %config, "true witness recorded");
            }
        }
        Ok(Admission::Accepted)
    }

    fn classify_false(&mut self, config: &Config) -> Result<Admission, LatticeError> {
        if self.trues.implies(config) {
            return Ok(Admission::Rejected);
        }
        if self.improbable.contains(config) && !self.falses.implies(config) {
            return Ok(Admission::Rejected);
        }
        match self.falses.insert(config.clone()) {
            Insertion::AlreadyImplied => {}
            Insertion::Extended { pruned } => {
                for retired in &pruned {
                    self.frontier.retire_supremum(retired);
                }
                self.frontier
                    .check_supremum(config, &self.trues, &self.improbable);
                for up in config.ups() {
                    if self.trues.contains(&up) {
                        self.frontier
                            .check_infimum(&up, &self.falses, &self.improbable);
                    }
                }
                debug!(config = %config, "false witness recorded");
            }
        }
        Ok(Admission::Accepted)
    }

    fn classify_improbable(&mut self, config: &Config) -> Result<Admission, LatticeError> {
        // Always accepted. Recorded only when nothing is implied for the
        // configuration; witness implication takes precedence otherwise.
        if !self.trues.implies(config) && !self.falses.implies(config) {
            self.improbable.insert(config.clone());
            for up in config.ups() {
                if self.trues.contains(&up) {
                    self.frontier
                        .check_infimum(&up, &self.falses, &self.improbable);
                }
            }
            for down in config.downs() {
                if self.falses.contains(&down) {
                    self.frontier
                        .check_supremum(&down, &self.trues, &self.improbable);
                }
            }
            debug!(config = %config, "improbable outcome recorded");
        }
        Ok(Admission::Accepted)
    }

    /// Look up what is known about `config` without touching the store.
    pub fn classification_of(&self, config: &Config) -> Classification {
        if self.pending.contains(config) {
            Classification::Pending
        } else if self.trues.implies(config) {
            Classification::True
        } else if self.falses.implies(config) {
            Classification::False
        } else if self.improbable.contains(config) {
            Classification::Improbable
        } else {
            Classification::Unknown
        }
    }

    /// True or False is implied for `config`, directly or transitively.
    pub fn is_implied(&self, config: &Config) -> bool {
        self.trues.implies(config) || self.falses.implies(config)
    }

    pub(crate) fn mark_pending(&mut self, config: Config) {
        assert_eq!(config.width(), self.width, "pending width mismatch");
        self.pending.insert(config);
    }

    pub(crate) fn clear_pending(&mut self, config: &Config) -> bool {
        self.pending.shift_remove(config)
    }

    /// Recompute the exact frontier antichains. Called once, after the
    /// last report has been applied.
    pub fn finalize(&mut self) {
        self.frontier
            .rebuild(&self.trues, &self.falses, &self.improbable);
    }

    pub fn summary(&self) -> LatticeSummary {
        LatticeSummary {
            trues: self.trues.len(),
            suprema: self.frontier.suprema().len(),
            improbable: self.improbable.len(),
            infima: self.frontier.infima().len(),
            falses: self.falses.len(),
            pending: self.pending.len(),
            best_true_weight: self.trues.best_weight(),
            best_false_weight: self.falses.best_weight(),
        }
    }

    pub fn trues(&self) -> &WitnessSet {
        &self.trues
    }

    pub fn falses(&self) -> &WitnessSet {
        &self.falses
    }

    pub fn improbable(&self) -> &IndexSet<Config> {
        &self.improbable
    }

    pub fn pending(&self) -> &IndexSet<Config> {
        &self.pending
    }

    pub fn suprema(&self) -> &IndexSet<Config> {
        self.frontier.suprema()
    }

    pub fn infima(&self) -> &IndexSet<Config> {
        self.frontier.infima()
    }
}
