// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Error types for the lattice core and the execution scheduler.
//!
//! Assumption violations are deliberately NOT represented here: a report
//! that contradicts the monotonicity assumption is an ordinary outcome of
//! the search (`Admission::Rejected`), not an error. Everything in this
//! module is either a programming mistake on the caller's side (wrong-width
//! configuration, inconsistent run context) or a broken collaborator
//! (a runner that went away without reporting).

use thiserror::Error;

/// Errors raised by the lattice state store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LatticeError {
    /// A configuration of the wrong width reached the store. Fatal: the
    /// caller constructed it for a different parameter set.
    #[error("configuration width {got} does not match lattice width {expected}")]
    WidthMismatch { expected: usize, got: usize },
}

/// Errors raised while validating a [`RunContext`](crate::context::RunContext).
///
/// Raised before a search starts, when the driver hands over an
/// inconsistent combination of options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContextError {
    #[error("max_procs must be at least 1")]
    NoExecutionSlots,

    #[error("a monotone search needs at least one of supremum / infimum")]
    NoDirections,

    #[error("the invariant strategy searches the whole space; directions do not apply")]
    InvariantWithDirections,

    #[error("the invariant strategy is driven by the enumerator, not the scheduler")]
    InvariantWithScheduler,

    #[error("the enumerator makes no assumption; use the scheduler for monotone strategies")]
    MonotoneWithEnumerator,

    #[error("the parameter set is empty")]
    NoParameters,
}

/// Errors raised by the scheduler control loop.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Lattice(#[from] LatticeError),

    /// The result channel disconnected while executions were still in
    /// flight. A conforming runner delivers exactly one report per
    /// dispatch, so this means the runner was torn down mid-run.
    #[error("program runner disconnected with {in_flight} execution(s) in flight")]
    RunnerDisconnected { in_flight: usize },
}

/// Error from parsing a configuration bit string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid configuration bit string: byte {byte:?} at position {position}")]
pub struct ParseConfigError {
    pub position: usize,
    pub byte: u8,
}
