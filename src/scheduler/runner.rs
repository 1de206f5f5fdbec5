// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! The seam between the core and the external program runner.
//!
//! The core never spawns processes, captures stdio or enforces timeouts;
//! it hands a [`ProgramRunner`] an [`ExecutionRequest`] together with a
//! channel sender and gets back a cancellation handle. The runner delivers
//! exactly one [`ExecutionReport`] per dispatch, mapping any internal
//! crash of its own to [`RunnerVerdict::Error`]. Whether to consult an
//! on-disk result cache before spawning is the runner's business; the
//! request carries a stable cache key for that purpose.

use crate::context::RunContext;
use crate::lattice::Config;
use crossbeam_channel::Sender;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::fmt::Write as _;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Raw verdict of one execution, before the assumption's sign is applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RunnerVerdict {
    Success,
    Fail,
    /// The execution was inconclusive: spawn failure, crash, or any
    /// internal error of the runner itself.
    Error,
    /// The execution was cancelled before it produced a verdict.
    Cancelled,
}

/// Everything the runner needs to execute one configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub config: Config,
    /// The included parameter tokens, in parameter order.
    pub params: Vec<String>,
    /// Stable key over the target identity and the configuration, for the
    /// runner's result cache.
    pub cache_key: String,
}

impl ExecutionRequest {
    pub fn new(context: &RunContext, config: &Config) -> Self {
        Self {
            params: context.parameters.materialize(config),
            cache_key: cache_key(&context.target_id, config),
            config: config.clone(),
        }
    }
}

/// One completed execution, delivered on the scheduler's result channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub config: Config,
    pub verdict: RunnerVerdict,
}

/// Cooperative cancellation token for one in-flight execution.
///
/// Cancellation is best-effort: the runner polls the flag at whatever
/// granularity it can. Cancelling an execution that already finished has
/// no effect.
#[derive(Debug, Clone, Default)]
pub struct CancelHandle {
    flag: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// The external program runner.
///
/// Implementations spawn the target program (or look the result up in a
/// cache) and send exactly one [`ExecutionReport`] for the request's
/// configuration on `results`, from any thread. The scheduler keeps a
/// clone of `cancel` and may trigger it at any time; a runner that
/// observes the flag reports [`RunnerVerdict::Cancelled`]. Dropping the
/// sender without reporting breaks the scheduler's accounting and must
/// not happen; report [`RunnerVerdict::Error`] instead.
pub trait ProgramRunner {
    fn dispatch(
        &mut self,
        request: ExecutionRequest,
        results: Sender<ExecutionReport>,
        cancel: CancelHandle,
    );
}

/// Stable cache key: SHA-256 over the target identity and the
/// configuration bit string, in hex.
pub fn cache_key(target_id: &str, config: &Config) -> String {
    let mut hasher = Sha256::new();
    hasher.update(target_id.as_bytes());
    hasher.update(b"\n");
    hasher.update(config.to_string().as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for byte in digest {
        let _ = write!(out, "{:02x}", byte);
    }
    out
}
