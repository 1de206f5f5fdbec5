// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The frontier-learning lattice.
//!
//! A run classifies subsets of N parameters (bit-vector [`Config`]s) as
//! True or False under a monotonicity assumption: True is upward-closed,
//! False is downward-closed. The lattice stores the extremal witnesses of
//! both regions, infers everything they imply, tracks the suprema / infima
//! frontier that constitutes the final answer, and proposes the next
//! configuration worth executing.
//!
//! Earlier revisions of this tool ran the state machine in a separate
//! process spoken to over a line protocol. Here it is an in-process value:
//! [`Lattice::report`] replaces the `true`/`false`/`improbable` exchange,
//! [`Lattice::next`] the `next`/`cancelled` exchange, and
//! [`Lattice::summary`] the `summary` exchange.

pub mod closure;
pub mod config;
pub mod frontier;
pub mod outcome;
pub mod selector;
pub mod store;

pub use closure::{Insertion, Orientation, WitnessSet};
pub use config::Config;
pub use outcome::{Admission, Classification, Outcome};
pub use selector::{CandidateSelector, Direction, DirectionSet};
pub use store::{LatticeStore, LatticeSummary};

use crate::error::LatticeError;
use indexmap::IndexSet;
use tracing::trace;

/// A candidate to execute next, plus the pending executions whose results
/// have become moot since they were dispatched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextMove {
    pub candidate: Config,
    pub cancelled: Vec<Config>,
}

/// Classification store and candidate selector behind one interface.
#[derive(Debug)]
pub struct Lattice {
    store: LatticeStore,
    selector: CandidateSelector,
}

impl Lattice {
    pub fn new(width: usize, require_at_least_one: bool) -> Self {
        Self {
            store: LatticeStore::new(width),
            selector: CandidateSelector::new(width, require_at_least_one),
        }
    }

    pub fn width(&self) -> usize {
        self.store.width()
    }

    /// Record a terminal outcome for `config` and feed the new knowledge
    /// to the candidate selector.
    ///
    /// Returns `Rejected` when the outcome contradicts an implied
    /// classification; the lattice is unchanged in that case.
    pub fn report(&mut self, config: &Config, outcome: Outcome) -> Result<Admission, LatticeError> {
        let prior = self.store.classification_of(config);
        let admission = self.store.classify(config, outcome)?;
        if admission == Admission::Accepted && !prior.is_terminal() {
            match outcome {
                Outcome::True => self.selector.observe_true(config, &self.store),
                Outcome::False => self.selector.observe_false(config, &self.store),
                Outcome::Improbable => self.selector.observe_improbable(config, &self.store),
            }
        }
        Ok(admission)
    }

    /// Propose the next configuration to execute for the requested
    /// directions, marking it pending. Also returns the pending entries
    /// whose classification has since become implied; those are removed
    /// from the pending set and should be cancelled by the caller.
    ///
    /// Returns `None` when every configuration is resolved or inferable.
    pub fn next(&mut self, directions: DirectionSet) -> Option<NextMove> {
        let candidate = self.selector.next(directions, &self.store)?;
        let cancelled: Vec<Config> = self
            .store
            .pending()
            .iter()
            .filter(|c| self.store.is_implied(c))
            .cloned()
            .collect();
        for c in &cancelled {
            self.store.clear_pending(c);
            trace!(config = %c, "pending execution became redundant");
        }
        self.store.mark_pending(candidate.clone());
        Some(NextMove {
            candidate,
            cancelled,
        })
    }

    /// Does every requested direction already have a frontier witness?
    pub fn frontier_satisfied(&self, directions: DirectionSet) -> bool {
        directions.any()
            && (!directions.supremum || !self.store.suprema().is_empty())
            && (!directions.infimum || !self.store.infima().is_empty())
    }

    pub fn classification_of(&self, config: &Config) -> Classification {
        self.store.classification_of(config)
    }

    pub fn summary(&self) -> LatticeSummary {
        self.store.summary()
    }

    /// Recompute the exact frontier antichains; call once, after the last
    /// report has been applied.
    pub fn finalize(&mut self) {
        self.store.finalize();
    }

    pub fn suprema(&self) -> &IndexSet<Config> {
        self.store.suprema()
    }

    pub fn infima(&self) -> &IndexSet<Config> {
        self.store.infima()
    }

    pub fn store(&self) -> &LatticeStore {
        &self.store
    }
}
