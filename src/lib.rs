// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Lattice-driven search for the parameter subsets that make a black-box
//! program fail.
//!
//! Given N parameters and a program treated as a black box, the crate
//! finds the minimal and/or maximal parameter subsets separating success
//! from failure, issuing as few executions as possible under a declared
//! monotonicity assumption.
//!
//! # Architecture
//!
//! The search is split across two tiers:
//!
//! ## Tier 1: The lattice (single-threaded state)
//!
//! - [`lattice::Config`] - fixed-width bit vectors over the parameters,
//!   ordered by inclusion
//! - [`lattice::store::LatticeStore`] - classifications, witness
//!   antichains and the improbable/pending records
//! - [`lattice::closure`] - inference under the monotonicity assumption
//! - [`lattice::frontier`] - the suprema / infima antichains that form
//!   the final answer
//! - [`lattice::selector`] - chooses the next configuration to execute
//!   and spots redundant in-flight executions
//!
//! ## Tier 2: The scheduler (bounded concurrency)
//!
//! - [`scheduler::Scheduler`] - the control loop; owns all lattice state
//!   on one thread, keeps up to `max_procs` executions outstanding, and
//!   cancels work invalidated by new knowledge
//! - [`scheduler::runner::ProgramRunner`] - the seam to the external
//!   process runner; the core never spawns processes itself
//! - [`scheduler::Enumerator`] - brute-force powerset enumeration for
//!   targets where no assumption holds
//!
//! # Example
//!
//! ```
//! use crossbeam_channel::Sender;
//! use findbug::context::{Assumption, ParameterSet, RunContext};
//! use findbug::lattice::DirectionSet;
//! use findbug::scheduler::{
//!     CancelHandle, ExecutionReport, ExecutionRequest, ProgramRunner, RunnerVerdict, Scheduler,
//! };
//!
//! // A stand-in for the external process runner: "fails when beta is
//! // present". Real runners spawn the target program and report back on
//! // the channel from their own thread.
//! struct Stub;
//!
//! impl ProgramRunner for Stub {
//!     fn dispatch(
//!         &mut self,
//!         request: ExecutionRequest,
//!         results: Sender<ExecutionReport>,
//!         _cancel: CancelHandle,
//!     ) {
//!         let verdict = if request.params.iter().any(|p| p == "beta") {
//!             RunnerVerdict::Fail
//!         } else {
//!             RunnerVerdict::Success
//!         };
//!         results
//!             .send(ExecutionReport { config: request.config, verdict })
//!             .unwrap();
//!     }
//! }
//!
//! let context = RunContext {
//!     parameters: ParameterSet::new(vec!["alpha".into(), "beta".into(), "gamma".into()]),
//!     target_id: "demo".into(),
//!     assumption: Assumption::Contravariant,
//!     directions: DirectionSet::INFIMUM,
//!     exhaust: true,
//!     require_at_least_one: false,
//!     max_procs: 4,
//! };
//!
//! let report = Scheduler::new(context, Stub).unwrap().run().unwrap();
//! assert_eq!(report.infima.len(), 1);
//! assert_eq!(report.infima[0].parameters, vec!["beta"]);
//! ```

pub mod context;
pub mod error;
pub mod lattice;
pub mod report;
pub mod scheduler;

// Re-export commonly used types
pub use context::{Assumption, ParameterSet, RunContext};
pub use error::{ContextError, LatticeError, SchedulerError};
pub use lattice::{Admission, Classification, Config, DirectionSet, Lattice, Outcome};
pub use report::{EnumerationReport, SearchReport};
pub use scheduler::{Enumerator, ProgramRunner, RunnerVerdict, Scheduler};
