// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use crossbeam_channel::Sender;
use findbug::context::{Assumption, ParameterSet, RunContext};
use findbug::lattice::{Config, DirectionSet};
use findbug::scheduler::{
    CancelHandle, ExecutionReport, ExecutionRequest, ProgramRunner, RunnerVerdict,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// A runner that answers synchronously, on the scheduler's own thread.
///
/// Deterministic and fast; used wherever real concurrency is not the
/// point of the test.
pub struct SyncRunner {
    verdict: Box<dyn FnMut(&Config) -> RunnerVerdict>,
    pub dispatched: u64,
}

impl SyncRunner {
    pub fn new(verdict: impl FnMut(&Config) -> RunnerVerdict + 'static) -> Self {
        Self {
            verdict: Box::new(verdict),
            dispatched: 0,
        }
    }
}

impl ProgramRunner for SyncRunner {
    fn dispatch(
        &mut self,
        request: ExecutionRequest,
        results: Sender<ExecutionReport>,
        _cancel: CancelHandle,
    ) {
        self.dispatched += 1;
        let verdict = (self.verdict)(&request.config);
        results
            .send(ExecutionReport {
                config: request.config,
                verdict,
            })
            .expect("scheduler holds the receiver");
    }
}

/// A runner that executes on one thread per dispatch, with a fixed delay,
/// polling its cancellation token the way a process runner would.
pub struct ThreadedRunner {
    verdict: Arc<dyn Fn(&Config) -> RunnerVerdict + Send + Sync>,
    delay: Duration,
    pub dispatched: Arc<AtomicU64>,
}

impl ThreadedRunner {
    pub fn new(
        delay: Duration,
        verdict: impl Fn(&Config) -> RunnerVerdict + Send + Sync + 'static,
    ) -> Self {
        Self {
            verdict: Arc::new(verdict),
            delay,
            dispatched: Arc::new(AtomicU64::new(0)),
        }
    }
}

impl ProgramRunner for ThreadedRunner {
    fn dispatch(
        &mut self,
        request: ExecutionRequest,
        results: Sender<ExecutionReport>,
        cancel: CancelHandle,
    ) {
        self.dispatched.fetch_add(1, Ordering::SeqCst);
        let token = cancel;
        let verdict_fn = Arc::clone(&self.verdict);
        let delay = self.delay;
        thread::spawn(move || {
            let deadline = Instant::now() + delay;
            while Instant::now() < deadline {
                if token.is_cancelled() {
                    // The receiver may already be gone at shutdown.
                    let _ = results.send(ExecutionReport {
                        config: request.config,
                        verdict: RunnerVerdict::Cancelled,
                    });
                    return;
                }
                thread::sleep(Duration::from_millis(1));
            }
            let verdict = (verdict_fn)(&request.config);
            let _ = results.send(ExecutionReport {
                config: request.config,
                verdict,
            });
        });
    }
}

/// A run context over single-letter parameters.
pub fn context_over(
    letters: &[&str],
    assumption: Assumption,
    directions: DirectionSet,
    exhaust: bool,
) -> RunContext {
    RunContext {
        parameters: ParameterSet::new(letters.iter().map(|s| s.to_string()).collect()),
        target_id: "integration-test".into(),
        assumption,
        directions,
        exhaust,
        require_at_least_one: false,
        max_procs: 4,
    }
}
