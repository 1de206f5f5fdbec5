// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The bounded-concurrency control loop.
//!
//! A single thread owns the lattice and every other piece of search state;
//! the only parallel units are the runner's executions, up to `max_procs`
//! of which may be outstanding at once. The loop:
//!
//! 1. Drains the result channel and applies each report to the lattice.
//! 2. Fills free execution slots: asks the lattice for the next candidate,
//!    cancels in-flight executions the lattice declared redundant, and
//!    dispatches the candidate to the runner.
//! 3. When no slot can be filled and work is in flight, blocks until the
//!    first outstanding execution completes.
//! 4. When nothing is in flight and no candidate exists, the search is
//!    complete: the frontier is finalized and the report built.
//!
//! Unless `exhaust` is set, the loop also stops as soon as every requested
//! frontier holds a witness, draining in-flight executions first so no
//! result produced by a real execution is thrown away.

pub mod bruteforce;
pub mod runner;
pub mod statistics;

pub use bruteforce::Enumerator;
pub use runner::{CancelHandle, ExecutionReport, ExecutionRequest, ProgramRunner, RunnerVerdict};
pub use statistics::{Counters, Statistics};

use crate::context::{Assumption, RunContext};
use crate::error::{ContextError, SchedulerError};
use crate::lattice::{Admission, Config, Lattice, Outcome};
use crate::report::{FrontierEntry, SearchReport, Tally};
use crossbeam_channel::{unbounded, Receiver, Sender};
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// Drives a monotone search to completion against an external runner.
pub struct Scheduler<R: ProgramRunner> {
    context: RunContext,
    runner: R,
    lattice: Lattice,
    in_flight: IndexMap<Config, CancelHandle>,
    results_tx: Sender<ExecutionReport>,
    results_rx: Receiver<ExecutionReport>,
    tally: Tally,
    statistics: Statistics,
}

impl<R: ProgramRunner> Scheduler<R> {
    /// Create a scheduler for a covariant or contravariant search.
    pub fn new(context: RunContext, runner: R) -> Result<Self, ContextError> {
        context.validate()?;
        if context.assumption == Assumption::Invariant {
            return Err(ContextError::InvariantWithScheduler);
        }
        let (results_tx, results_rx) = unbounded();
        let width = context.width();
        Ok(Self {
            lattice: Lattice::new(width, context.require_at_least_one),
            tally: Tally::new(width),
            statistics: Statistics::new(),
            in_flight: IndexMap::new(),
            results_tx,
            results_rx,
            context,
            runner,
        })
    }

    /// Run the search to completion.
    ///
    /// Consumes the scheduler and returns the finalized report. The call
    /// blocks the current thread; executions proceed in parallel on the
    /// runner's side.
    pub fn run(mut self) -> Result<SearchReport, SchedulerError> {
        self.seed()?;
        info!(width = self.context.width(), "lattice search started");
        loop {
            self.drain_results()?;
            while self.in_flight.len() < self.context.max_procs {
                self.drain_results()?;
                if self.frontier_found() {
                    break;
                }
                debug!(
                    in_flight = self.in_flight.len(),
                    max_procs = self.context.max_procs,
                    "asking for the next move"
                );
                let Some(mv) = self.lattice.next(self.context.directions) else {
                    debug!("no more suggestions, waiting for executions to finish");
                    break;
                };
                self.cancel_redundant(&mv.cancelled);
                self.dispatch(mv.candidate);
            }
            if self.frontier_found() {
                info!("requested frontier found, stop dispatching");
                self.drain_in_flight()?;
                break;
            }
            if self.in_flight.is_empty() {
                break;
            }
            self.wait_for_one()?;
        }
        info!("no more running executions, start post-processing");
        self.lattice.finalize();
        info!(
            dispatched = self.statistics.get(Counters::Dispatched),
            cancelled = self.statistics.get(Counters::Cancelled),
            violations = self.statistics.get(Counters::Violations),
            late_results = self.statistics.get(Counters::LateResults),
            "search statistics"
        );
        Ok(self.build_report())
    }

    /// Register the a priori boundary classifications for the requested
    /// directions, before anything is executed.
    fn seed(&mut self) -> Result<(), SchedulerError> {
        let width = self.context.width();
        if self.context.directions.infimum {
            debug!("seeding the top of the lattice as true");
            self.seed_one(Config::top(width), Outcome::True)?;
        }
        if self.context.directions.supremum {
            if self.context.require_at_least_one {
                debug!("seeding every singleton as false");
                for i in 0..width {
                    self.seed_one(Config::from_indices(width, &[i]), Outcome::False)?;
                }
            } else {
                debug!("seeding the bottom of the lattice as false");
                self.seed_one(Config::bottom(width), Outcome::False)?;
            }
        } else if !self.context.require_at_least_one {
            debug!("seeding the bottom of the lattice as improbable");
            self.seed_one(Config::bottom(width), Outcome::Improbable)?;
        }
        Ok(())
    }

    fn seed_one(&mut self, config: Config, outcome: Outcome) -> Result<(), SchedulerError> {
        if self.lattice.report(&config, outcome)? == Admission::Rejected {
            warn!(config = %config, %outcome, "seed contradicts an earlier seed, ignored");
        }
        Ok(())
    }

    /// True when the search may stop early: `exhaust` is off and every
    /// requested frontier already holds a witness.
    fn frontier_found(&self) -> bool {
        !self.context.exhaust && self.lattice.frontier_satisfied(self.context.directions)
    }

    fn dispatch(&mut self, config: Config) {
        let request = ExecutionRequest::new(&self.context, &config);
        info!(config = %config, cache_key = %request.cache_key, "starting new execution");
        let handle = CancelHandle::new();
        self.runner
            .dispatch(request, self.results_tx.clone(), handle.clone());
        self.statistics.increment(Counters::Dispatched);
        self.in_flight.insert(config, handle);
    }

    fn cancel_redundant(&mut self, cancelled: &[Config]) {
        if !cancelled.is_empty() {
            info!(count = cancelled.len(), "cancelling redundant executions");
        }
        for config in cancelled {
            match self.in_flight.shift_remove(config) {
                Some(handle) => {
                    handle.cancel();
                    self.statistics.increment(Counters::Cancelled);
                }
                None => {
                    warn!(config = %config, "execution already finished, nothing to cancel");
                }
            }
        }
    }

    /// Apply every report already sitting in the channel.
    fn drain_results(&mut self) -> Result<(), SchedulerError> {
        let ready: Vec<ExecutionReport> = self.results_rx.try_iter().collect();
        for report in ready {
            self.apply(report)?;
        }
        Ok(())
    }

    /// Block until one in-flight execution completes and apply it.
    fn wait_for_one(&mut self) -> Result<(), SchedulerError> {
        debug!(in_flight = self.in_flight.len(), "waiting for an execution to finish");
        match self.results_rx.recv() {
            Ok(report) => self.apply(report),
            Err(_) => Err(SchedulerError::RunnerDisconnected {
                in_flight: self.in_flight.len(),
            }),
        }
    }

    /// Let every outstanding execution finish and apply its result.
    fn drain_in_flight(&mut self) -> Result<(), SchedulerError> {
        while !self.in_flight.is_empty() {
            self.wait_for_one()?;
        }
        Ok(())
    }

    fn apply(&mut self, report: ExecutionReport) -> Result<(), SchedulerError> {
        self.tally.record(report.config.weight(), report.verdict);
        if self.in_flight.shift_remove(&report.config).is_none() {
            debug!(config = %report.config, "dropping report of a cancelled execution");
            self.statistics.increment(Counters::LateResults);
            return Ok(());
        }
        let outcome = match report.verdict {
            RunnerVerdict::Cancelled => {
                debug!(config = %report.config, "dropping cancellation report");
                return Ok(());
            }
            RunnerVerdict::Error => Outcome::Improbable,
            RunnerVerdict::Success | RunnerVerdict::Fail => {
                let success = report.verdict == RunnerVerdict::Success;
                let truth = match self.context.assumption {
                    Assumption::Covariant => success,
                    Assumption::Contravariant => !success,
                    Assumption::Invariant => unreachable!("checked at construction"),
                };
                if truth {
                    Outcome::True
                } else {
                    Outcome::False
                }
            }
        };
        info!(config = %report.config, %outcome, "reporting to the lattice");
        match self.lattice.report(&report.config, outcome)? {
            Admission::Accepted => {
                debug!(config = %report.config, "report accepted by the lattice");
            }
            Admission::Rejected => {
                warn!(
                    config = %report.config,
                    verdict = ?report.verdict,
                    "assumption violation found, ignoring the result"
                );
                self.statistics.increment(Counters::Violations);
            }
        }
        Ok(())
    }

    fn build_report(&self) -> SearchReport {
        let summary = self.lattice.summary();
        if self.context.directions.supremum {
            if summary.suprema > 0 {
                info!(count = summary.suprema, "suprema found");
            } else {
                warn!("no supremum found");
            }
        }
        if self.context.directions.infimum {
            if summary.infima > 0 {
                info!(count = summary.infima, "infima found");
            } else {
                warn!("no infimum found");
            }
        }
        SearchReport {
            summary,
            suprema: self
                .lattice
                .suprema()
                .iter()
                .map(|c| FrontierEntry::new(c, &self.context.parameters))
                .collect(),
            infima: self
                .lattice
                .infima()
                .iter()
                .map(|c| FrontierEntry::new(c, &self.context.parameters))
                .collect(),
            tally: self.tally.clone(),
        }
    }
}
