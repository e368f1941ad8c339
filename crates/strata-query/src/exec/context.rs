//! Execution context for query execution.
//!
//! [`ExecutionConfig`] carries the runtime knobs for a query,
//! [`ExecutionStats`] the counters collected while it runs, and
//! [`PullContext`] is what one pull hands down the operator tree.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::{Deserialize, Serialize};

use super::result::ResultSink;

/// Context lent to an operator tree for the duration of one pull.
///
/// It borrows the caller's result sink and statistics; operators may
/// append to the sink during the call but cannot keep it afterwards.
pub struct PullContext<'a> {
    /// The caller's result sink.
    sink: &'a mut dyn ResultSink,
    /// Counters to update, if the caller collects them.
    stats: Option<&'a ExecutionStats>,
}

impl<'a> PullContext<'a> {
    /// Creates a context over a sink without statistics.
    pub fn new(sink: &'a mut dyn ResultSink) -> Self {
        Self { sink, stats: None }
    }

    /// Creates a context that also records statistics.
    pub fn with_stats(sink: &'a mut dyn ResultSink, stats: &'a ExecutionStats) -> Self {
        Self { sink, stats: Some(stats) }
    }

    /// Returns the result sink.
    #[inline]
    #[must_use]
    pub fn sink(&self) -> &dyn ResultSink {
        &*self.sink
    }

    /// Returns the result sink for appending.
    #[inline]
    pub fn sink_mut(&mut self) -> &mut dyn ResultSink {
        &mut *self.sink
    }

    /// Records that a record was pulled from a child.
    #[inline]
    pub fn record_pulled(&self) {
        if let Some(stats) = self.stats {
            stats.records_pulled.fetch_add(1, Ordering::Relaxed);
        }
    }

    /// Records that a result row was appended to the sink.
    #[inline]
    pub fn record_row_produced(&self) {
        if let Some(stats) = self.stats {
            stats.rows_produced.fetch_add(1, Ordering::Relaxed);
        }
    }
}

impl std::fmt::Debug for PullContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PullContext")
            .field("sink_full", &self.sink.is_full())
            .field("stats", &self.stats)
            .finish()
    }
}

/// Execution statistics collected during query execution.
#[derive(Debug)]
pub struct ExecutionStats {
    /// When execution started.
    start_time: Instant,
    /// Number of records pulled from the terminal operator's child.
    records_pulled: AtomicU64,
    /// Number of rows appended to the result sink.
    rows_produced: AtomicU64,
}

impl ExecutionStats {
    /// Creates new execution statistics.
    #[must_use]
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            records_pulled: AtomicU64::new(0),
            rows_produced: AtomicU64::new(0),
        }
    }

    /// Returns the number of records pulled.
    #[inline]
    #[must_use]
    pub fn records_pulled(&self) -> u64 {
        self.records_pulled.load(Ordering::Relaxed)
    }

    /// Returns the number of rows produced.
    #[inline]
    #[must_use]
    pub fn rows_produced(&self) -> u64 {
        self.rows_produced.load(Ordering::Relaxed)
    }

    /// Returns the elapsed execution time.
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> std::time::Duration {
        self.start_time.elapsed()
    }
}

impl Default for ExecutionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration options for query execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    /// Maximum number of result rows a query may produce.
    ///
    /// Once the result set holds this many rows the terminal operator stops
    /// pulling from its child and the query completes successfully.
    /// Set to 0 for no limit.
    pub max_result_rows: usize,
    /// Whether to collect detailed statistics.
    pub collect_stats: bool,
}

impl ExecutionConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub const fn new() -> Self {
        Self { max_result_rows: 0, collect_stats: false }
    }

    /// Sets the maximum number of result rows.
    #[must_use]
    pub const fn with_max_result_rows(mut self, limit: usize) -> Self {
        self.max_result_rows = limit;
        self
    }

    /// Enables statistics collection.
    #[must_use]
    pub const fn with_stats(mut self) -> Self {
        self.collect_stats = true;
        self
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new()
    }
}
