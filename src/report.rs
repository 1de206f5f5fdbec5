// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Outcome tallies and the final run report.
//!
//! Every execution verdict is counted twice: once overall and once under
//! the subset size (Hamming weight) of its configuration, which is what
//! the driver prints as the per-level summary. The [`SearchReport`] is
//! what the driver receives back when a search completes; it serializes
//! cleanly so drivers can persist it as JSON.

use crate::context::ParameterSet;
use crate::lattice::{Config, LatticeSummary};
use crate::scheduler::runner::RunnerVerdict;
use serde::Serialize;

/// Counts per verdict kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VerdictCounts {
    pub success: u64,
    pub fail: u64,
    pub error: u64,
    pub cancelled: u64,
}

impl VerdictCounts {
    fn record(&mut self, verdict: RunnerVerdict) {
        match verdict {
            RunnerVerdict::Success => self.success += 1,
            RunnerVerdict::Fail => self.fail += 1,
            RunnerVerdict::Error => self.error += 1,
            RunnerVerdict::Cancelled => self.cancelled += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.fail + self.error + self.cancelled
    }

    /// Everything that produced a verdict, cancelled executions excluded.
    pub fn concluded(&self) -> u64 {
        self.success + self.fail + self.error
    }
}

/// Verdict counts overall and per subset size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tally {
    totals: VerdictCounts,
    by_weight: Vec<VerdictCounts>,
}

impl Tally {
    pub fn new(width: usize) -> Self {
        Self {
            totals: VerdictCounts::default(),
            by_weight: vec![VerdictCounts::default(); width + 1],
        }
    }

    pub fn record(&mut self, weight: usize, verdict: RunnerVerdict) {
        self.totals.record(verdict);
        self.by_weight[weight].record(verdict);
    }

    pub fn totals(&self) -> &VerdictCounts {
        &self.totals
    }

    pub fn at_weight(&self, weight: usize) -> &VerdictCounts {
        &self.by_weight[weight]
    }

    pub fn by_weight(&self) -> &[VerdictCounts] {
        &self.by_weight
    }
}

/// One frontier witness, materialized for the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrontierEntry {
    /// The configuration as a bit string, parameter 0 leftmost.
    pub config: String,
    /// The included parameter tokens.
    pub parameters: Vec<String>,
}

impl FrontierEntry {
    pub fn new(config: &Config, parameters: &ParameterSet) -> Self {
        Self {
            config: config.to_string(),
            parameters: parameters.materialize(config),
        }
    }
}

/// Result of a monotone (lattice-driven) search.
#[derive(Debug, Clone, Serialize)]
pub struct SearchReport {
    pub summary: LatticeSummary,
    pub suprema: Vec<FrontierEntry>,
    pub infima: Vec<FrontierEntry>,
    pub tally: Tally,
}

/// Result of a brute-force enumeration.
#[derive(Debug, Clone, Serialize)]
pub struct EnumerationReport {
    /// Number of configurations executed.
    pub executed: u64,
    pub tally: Tally,
}
