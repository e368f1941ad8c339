//! Main query executor.
//!
//! This module provides the [`Executor`] that drives an operator tree,
//! pulling from the root until the tree is exhausted, the result sink is
//! full, or an operator fails.

use std::sync::Arc;

use tracing::debug;

use crate::error::{OperatorError, OperatorResult};

use super::context::{ExecutionConfig, ExecutionStats, PullContext};
use super::operator::{release_tree, BoxedOperator, OpStatus, Operator, OperatorState};
use super::record::{Record, RecordLayout};
use super::result::{ResultSet, ResultSink};

/// How a drain ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// The tree ran out of records.
    Exhausted,
    /// The result sink filled up. Rows already appended are kept.
    QuotaMet,
}

/// The main query executor.
///
/// Owns the root of an operator tree and the record slot the tree writes
/// into. The tree is released exactly once: by [`run`](Self::run),
/// [`execute`](Self::execute), an explicit [`release`](Self::release), or
/// when the executor is dropped.
pub struct Executor {
    /// The root operator of the tree.
    root: BoxedOperator,
    /// Execution configuration.
    config: ExecutionConfig,
    /// Statistics, when enabled by the configuration.
    stats: Option<ExecutionStats>,
    /// The record slot lent to the tree on every pull.
    record: Record,
    /// Whether the tree has been released.
    released: bool,
}

impl Executor {
    /// Creates an executor with the default configuration.
    #[must_use]
    pub fn new(root: BoxedOperator) -> Self {
        Self::with_config(root, ExecutionConfig::default())
    }

    /// Creates an executor with the given configuration.
    #[must_use]
    pub fn with_config(root: BoxedOperator, config: ExecutionConfig) -> Self {
        let stats = config.collect_stats.then(ExecutionStats::new);
        Self { root, config, stats, record: Record::empty(), released: false }
    }

    /// Returns the result column layout.
    #[must_use]
    pub fn layout(&self) -> Arc<RecordLayout> {
        self.root.layout()
    }

    /// Returns the result column names.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.root.layout().names().into_iter().map(str::to_string).collect()
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &ExecutionConfig {
        &self.config
    }

    /// Returns the statistics, if they are being collected.
    #[must_use]
    pub fn stats(&self) -> Option<&ExecutionStats> {
        self.stats.as_ref()
    }

    /// Returns the state of the root operator.
    #[must_use]
    pub fn state(&self) -> OperatorState {
        self.root.state()
    }

    /// Returns the root operator.
    #[must_use]
    pub fn root(&self) -> &dyn Operator {
        self.root.as_ref()
    }

    /// Returns true once the tree has been released.
    #[must_use]
    pub const fn is_released(&self) -> bool {
        self.released
    }

    /// Creates an empty result set for this query, honouring the configured
    /// row limit.
    #[must_use]
    pub fn result_set(&self) -> ResultSet {
        ResultSet::from_config(self.root.layout(), &self.config)
    }

    /// Pulls once from the root.
    pub fn step(&mut self, sink: &mut dyn ResultSink) -> OperatorResult<OpStatus> {
        if self.released {
            return Err(OperatorError::Released(self.root.name()));
        }
        let mut ctx = match &self.stats {
            Some(stats) => PullContext::with_stats(sink, stats),
            None => PullContext::new(sink),
        };
        self.root.consume(&mut ctx, &mut self.record)
    }

    /// Pulls from the root until it is exhausted or the sink is full.
    ///
    /// The tree is not released, so it can be reset and drained again.
    pub fn drain(&mut self, sink: &mut dyn ResultSink) -> OperatorResult<DrainOutcome> {
        let mut pulls = 0u64;
        loop {
            let status = self.step(sink)?;
            pulls += 1;
            match status {
                OpStatus::Yielded => {}
                OpStatus::Depleted => {
                    debug!(pulls, "query exhausted");
                    return Ok(DrainOutcome::Exhausted);
                }
                OpStatus::QuotaMet => {
                    debug!(pulls, "result quota met");
                    return Ok(DrainOutcome::QuotaMet);
                }
            }
        }
    }

    /// Drains the tree into `sink` and releases it, whatever the outcome.
    pub fn run(&mut self, sink: &mut dyn ResultSink) -> OperatorResult<DrainOutcome> {
        let outcome = self.drain(sink);
        self.release();
        outcome
    }

    /// Runs the query into a fresh result set and returns it.
    pub fn execute(&mut self) -> OperatorResult<ResultSet> {
        let mut result = self.result_set();
        self.run(&mut result)?;
        Ok(result)
    }

    /// Returns the whole tree to its initial state so it can be drained
    /// again. Statistics start over.
    pub fn reset(&mut self) -> OperatorResult<()> {
        if self.released {
            return Err(OperatorError::Released(self.root.name()));
        }
        self.root.reset()?;
        if self.stats.is_some() {
            self.stats = Some(ExecutionStats::new());
        }
        Ok(())
    }

    /// Releases the tree. Calling this more than once has no effect.
    pub fn release(&mut self) {
        if self.released {
            return;
        }
        release_tree(self.root.as_mut());
        self.released = true;
        debug!(root = self.root.name(), "released operator tree");
    }

    /// Renders the operator tree, one operator per line, children
    /// indented under their parent.
    #[must_use]
    pub fn explain(&self) -> String {
        let mut out = String::new();
        explain_node(self.root.as_ref(), 0, &mut out);
        out
    }
}

impl Drop for Executor {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Executor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Executor")
            .field("root", &self.root.name())
            .field("state", &self.root.state())
            .field("config", &self.config)
            .field("released", &self.released)
            .finish_non_exhaustive()
    }
}

fn explain_node(op: &dyn Operator, depth: usize, out: &mut String) {
    out.push_str(&"  ".repeat(depth));
    out.push_str(op.name());
    out.push_str(" [");
    out.push_str(&op.layout().names().join(", "));
    out.push_str("]\n");
    for child in op.children() {
        explain_node(child.as_ref(), depth + 1, out);
    }
}
