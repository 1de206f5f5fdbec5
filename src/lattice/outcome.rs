// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Terminal outcomes and per-configuration classification states.
//!
//! Outcomes live in the post-assumption space: the scheduler has already
//! mapped the runner's raw success/fail verdict through the assumption's
//! sign before anything reaches the lattice, so True is always the
//! upward-closed region and False the downward-closed one.

use serde::Serialize;
use std::fmt;

/// A terminal result for one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// The execution landed on the True side of the frontier.
    True,
    /// The execution landed on the False side of the frontier.
    False,
    /// The execution was inconclusive (crash, internal error). Recorded,
    /// but carries no inferential weight.
    Improbable,
}

/// What the lattice currently knows about a configuration.
///
/// Lifecycle: `Unknown -> Pending -> {True, False, Improbable}` for a
/// directly tested configuration, `Unknown -> {True, False}` for an
/// inferred one, and `Pending -> Unknown` on cancellation. The terminal
/// states are final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Nothing known and nothing in flight.
    Unknown,
    /// Dispatched to the program runner, result not yet applied.
    Pending,
    True,
    False,
    Improbable,
}

impl Classification {
    /// True and False are the only states that support inference.
    pub fn is_decided(self) -> bool {
        matches!(self, Classification::True | Classification::False)
    }

    /// Any terminal state, including Improbable.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Classification::True | Classification::False | Classification::Improbable
        )
    }
}

/// Verdict of [`classify`](crate::lattice::Lattice::report) on a terminal
/// report.
///
/// `Rejected` means the report contradicts a classification already implied
/// by the witness sets: the declared monotonicity assumption does not hold
/// for the target program. The store is left unchanged and the caller must
/// not retry the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    Accepted,
    Rejected,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::True => write!(f, "true"),
            Outcome::False => write!(f, "false"),
            Outcome::Improbable => write!(f, "improbable"),
        }
    }
}
