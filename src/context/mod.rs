// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Run context: everything the driver decides before the search starts.
//!
//! The driver (command line or otherwise) parses and validates its own
//! options, then hands the core a single explicit [`RunContext`]. Nothing
//! in the core reads process-wide state.

use crate::error::ContextError;
use crate::lattice::{Config, DirectionSet};
use serde::Serialize;

/// The declared monotonicity assumption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Assumption {
    /// Adding parameters to a successful execution cannot make it fail:
    /// success is monotone non-decreasing, so a raw success maps to True.
    Covariant,
    /// Adding parameters to a failing execution cannot make it succeed:
    /// the mapping of success and failure onto True and False is flipped.
    Contravariant,
    /// No assumption; the whole space is enumerated by brute force.
    Invariant,
}

/// The ordered, immutable parameter tokens of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterSet {
    tokens: Vec<String>,
}

impl ParameterSet {
    pub fn new(tokens: Vec<String>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.tokens.get(i).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }

    /// The ordered tokens a configuration includes.
    ///
    /// # Panics
    ///
    /// Panics if the configuration width does not match the set.
    pub fn materialize(&self, config: &Config) -> Vec<String> {
        assert_eq!(
            config.width(),
            self.tokens.len(),
            "configuration width does not match parameter set"
        );
        config.included().map(|i| self.tokens[i].clone()).collect()
    }
}

impl From<Vec<String>> for ParameterSet {
    fn from(tokens: Vec<String>) -> Self {
        Self::new(tokens)
    }
}

impl From<&[&str]> for ParameterSet {
    fn from(tokens: &[&str]) -> Self {
        Self::new(tokens.iter().map(|s| s.to_string()).collect())
    }
}

/// Options governing one search, assembled by the driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunContext {
    pub parameters: ParameterSet,
    /// Opaque identity of the target program; part of every cache key.
    pub target_id: String,
    pub assumption: Assumption,
    pub directions: DirectionSet,
    /// Keep searching until every frontier element is found, instead of
    /// stopping at the first.
    pub exhaust: bool,
    /// Never execute the empty configuration.
    pub require_at_least_one: bool,
    /// Maximum number of concurrently outstanding executions.
    pub max_procs: usize,
}

impl RunContext {
    /// Number of parameters, i.e. the configuration width.
    pub fn width(&self) -> usize {
        self.parameters.len()
    }

    /// Consistency checks on the driver's choices.
    pub fn validate(&self) -> Result<(), ContextError> {
        if self.max_procs == 0 {
            return Err(ContextError::NoExecutionSlots);
        }
        if self.parameters.is_empty() {
            return Err(ContextError::NoParameters);
        }
        match self.assumption {
            Assumption::Invariant => {
                if self.directions.any() {
                    return Err(ContextError::InvariantWithDirections);
                }
            }
            Assumption::Covariant | Assumption::Contravariant => {
                if !self.directions.any() {
                    return Err(ContextError::NoDirections);
                }
            }
        }
        Ok(())
    }
}
