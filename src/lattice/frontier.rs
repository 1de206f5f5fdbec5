// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Frontier tracking: the extremal witnesses that form the final answer.
//!
//! The infima are the minimal True witnesses whose immediate subsets are
//! all implied False or recorded improbable; the suprema are the maximal
//! False witnesses whose immediate supersets are all implied True or
//! recorded improbable. A witness enters a frontier set only once every
//! neighbor in the relevant direction is resolved, so each frontier set is
//! a subset of the corresponding witness antichain and therefore itself an
//! antichain at all times.

use crate::lattice::closure::WitnessSet;
use crate::lattice::Config;
use indexmap::IndexSet;

/// The suprema / infima antichains, maintained incrementally and
/// recomputed exactly on [`rebuild`](Frontier::rebuild).
#[derive(Debug, Default)]
pub struct Frontier {
    suprema: IndexSet<Config>,
    infima: IndexSet<Config>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit `t` (a True witness) to the infima if every immediate subset
    /// is implied False or improbable. Returns whether it was admitted.
    pub fn check_infimum(
        &mut self,
        t: &Config,
        falses: &WitnessSet,
        improbable: &IndexSet<Config>,
    ) -> bool {
        for down in t.downs() {
            if !falses.implies(&down) && !improbable.contains(&down) {
                return false;
            }
        }
        self.infima.insert(t.clone());
        true
    }

    /// Admit `f` (a False witness) to the suprema if every immediate
    /// superset is implied True or improbable. Returns whether it was
    /// admitted.
    pub fn check_supremum(
        &mut self,
        f: &Config,
        trues: &WitnessSet,
        improbable: &IndexSet<Config>,
    ) -> bool {
        for up in f.ups() {
            if !trues.implies(&up) && !improbable.contains(&up) {
                return false;
            }
        }
        self.suprema.insert(f.clone());
        true
    }

    /// Drop a retired True witness from the infima.
    pub fn retire_infimum(&mut self, t: &Config) {
        self.infima.shift_remove(t);
    }

    /// Drop a retired False witness from the suprema.
    pub fn retire_supremum(&mut self, f: &Config) {
        self.suprema.shift_remove(f);
    }

    /// Recompute both frontier sets from the witness antichains. Called
    /// once at the end of the search, when no further report can arrive.
    pub fn rebuild(
        &mut self,
        trues: &WitnessSet,
        falses: &WitnessSet,
        improbable: &IndexSet<Config>,
    ) {
        self.suprema.clear();
        self.infima.clear();
        for t in trues.iter() {
            self.check_infimum(t, falses, improbable);
        }
        for f in falses.iter() {
            self.check_supremum(f, trues, improbable);
        }
    }

    pub fn suprema(&self) -> &IndexSet<Config> {
        &self.suprema
    }

    pub fn infima(&self) -> &IndexSet<Config> {
        &self.infima
    }
}
