// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Brute-force enumeration: the no-assumption strategy.
//!
//! When the target program is not monotone in either direction there is
//! nothing to infer and nothing to cancel: every configuration in the
//! powerset is executed exactly once through the same bounded-concurrency
//! runner seam, and the verdicts are tallied overall and per subset size.

use crate::context::{Assumption, RunContext};
use crate::error::{ContextError, SchedulerError};
use crate::lattice::Config;
use crate::report::{EnumerationReport, Tally};
use crate::scheduler::runner::{CancelHandle, ExecutionReport, ExecutionRequest, ProgramRunner};
use crossbeam_channel::{unbounded, Receiver, Sender};
use tracing::{debug, info};

/// Runs the full powerset against the program runner.
pub struct Enumerator<R: ProgramRunner> {
    context: RunContext,
    runner: R,
    results_tx: Sender<ExecutionReport>,
    results_rx: Receiver<ExecutionReport>,
    tally: Tally,
    in_flight: usize,
}

impl<R: ProgramRunner> Enumerator<R> {
    pub fn new(context: RunContext, runner: R) -> Result<Self, ContextError> {
        context.validate()?;
        if context.assumption != Assumption::Invariant {
            return Err(ContextError::MonotoneWithEnumerator);
        }
        let (results_tx, results_rx) = unbounded();
        let width = context.width();
        Ok(Self {
            tally: Tally::new(width),
            in_flight: 0,
            results_tx,
            results_rx,
            context,
            runner,
        })
    }

    /// Execute every configuration and tally the verdicts. Terminates only
    /// when the whole powerset has been dispatched and completed.
    pub fn run(mut self) -> Result<EnumerationReport, SchedulerError> {
        let width = self.context.width();
        info!(width, "brute-force enumeration started");

        let mut executed: u64 = 0;
        let mut next = Some(Config::bottom(width));
        if self.context.require_at_least_one {
            next = next.and_then(|c| c.succ());
        }
        loop {
            while self.in_flight < self.context.max_procs {
                let Some(config) = next.take() else { break };
                next = config.succ();
                let request = ExecutionRequest::new(&self.context, &config);
                debug!(config = %config, "dispatching");
                // No cancellation in this mode; the handle is never triggered.
                self.runner
                    .dispatch(request, self.results_tx.clone(), CancelHandle::new());
                self.in_flight += 1;
                executed += 1;
            }
            if self.in_flight == 0 {
                break;
            }
            match self.results_rx.recv() {
                Ok(report) => {
                    self.tally.record(report.config.weight(), report.verdict);
                    self.in_flight -= 1;
                }
                Err(_) => {
                    return Err(SchedulerError::RunnerDisconnected {
                        in_flight: self.in_flight,
                    })
                }
            }
        }
        info!(executed, "enumeration finished");
        Ok(EnumerationReport {
            executed,
            tally: self.tally,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ParameterSet;
    use crate::lattice::DirectionSet;
    use crate::scheduler::runner::RunnerVerdict;

    struct ParityRunner;

    impl ProgramRunner for ParityRunner {
        fn dispatch(
            &mut self,
            request: ExecutionRequest,
            results: Sender<ExecutionReport>,
            _cancel: CancelHandle,
        ) {
            let verdict = if request.config.weight() % 2 == 0 {
                RunnerVerdict::Success
            } else {
                RunnerVerdict::Fail
            };
            results
                .send(ExecutionReport {
                    config: request.config,
                    verdict,
                })
                .expect("enumerator holds the receiver");
        }
    }

    fn context(require_at_least_one: bool) -> RunContext {
        RunContext {
            parameters: ParameterSet::new(vec!["a".into(), "b".into(), "c".into()]),
            target_id: "parity".into(),
            assumption: Assumption::Invariant,
            directions: DirectionSet {
                supremum: false,
                infimum: false,
            },
            exhaust: false,
            require_at_least_one,
            max_procs: 3,
        }
    }

    #[test]
    fn test_full_powerset_is_counted() {
        let report = Enumerator::new(context(false), ParityRunner).unwrap().run().unwrap();
        assert_eq!(report.executed, 8);
        assert_eq!(report.tally.totals().total(), 8);
        // Even-weight subsets of 3 elements: 000 plus the three pairs.
        assert_eq!(report.tally.totals().success, 4);
        assert_eq!(report.tally.totals().fail, 4);
        assert_eq!(report.tally.at_weight(2).success, 3);
    }

    #[test]
    fn test_at_least_one_skips_the_empty_configuration() {
        let report = Enumerator::new(context(true), ParityRunner).unwrap().run().unwrap();
        assert_eq!(report.executed, 7);
        assert_eq!(report.tally.totals().total(), 7);
        assert_eq!(report.tally.at_weight(0).total(), 0);
    }

    #[test]
    fn test_monotone_context_is_refused() {
        let mut ctx = context(false);
        ctx.assumption = Assumption::Covariant;
        ctx.directions = DirectionSet::BOTH;
        let err = Enumerator::new(ctx, ParityRunner).err().unwrap();
        assert_eq!(err, ContextError::MonotoneWithEnumerator);
    }
}
