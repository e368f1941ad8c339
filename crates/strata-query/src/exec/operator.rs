//! Operator trait and base types.
//!
//! This module defines the [`Operator`] trait that all execution
//! operators implement, and the tree walk that releases a whole operator
//! tree.

use std::sync::Arc;

use crate::error::{OperatorError, OperatorResult};

use super::context::PullContext;
use super::record::{Record, RecordLayout};

/// The outcome of a successful pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpStatus {
    /// A record was written into the caller's record slot.
    Yielded,
    /// The operator has no more records.
    Depleted,
    /// The result sink is full; no work was done.
    ///
    /// This ends the pull loop successfully: every row already in the sink
    /// is kept.
    QuotaMet,
}

impl OpStatus {
    /// Returns true if the pull loop should stop.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Yielded)
    }
}

/// The state of an operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorState {
    /// Operator can be asked for the next record.
    Ready,
    /// Operator has signaled end-of-stream (or quota met).
    Depleted,
    /// Operator failed; only `reset` or `release` are meaningful.
    Errored,
    /// Operator resources have been released.
    Released,
}

impl OperatorState {
    /// Returns true if the operator can produce records.
    #[must_use]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true if the operator is exhausted.
    #[must_use]
    pub const fn is_depleted(self) -> bool {
        matches!(self, Self::Depleted)
    }

    /// Returns true if the operator failed.
    #[must_use]
    pub const fn is_errored(self) -> bool {
        matches!(self, Self::Errored)
    }

    /// Returns true if the operator has been released.
    #[must_use]
    pub const fn is_released(self) -> bool {
        matches!(self, Self::Released)
    }
}

/// The operator trait for pull-based query execution.
///
/// Operators are organized in a tree. Records flow from leaf operators up
/// to the root; pull requests flow down. Each node owns its children.
///
/// # Lifecycle
///
/// 1. **Ready**: after construction or `reset`; `consume` may be called
/// 2. **Depleted**: after `consume` returns [`OpStatus::Depleted`] or
///    [`OpStatus::QuotaMet`]; further `consume` calls report `Depleted`
///    again without doing work
/// 3. **Errored**: after `consume` returns an error
/// 4. **Released**: after `release`; terminal
///
/// `reset` applies to the whole subtree: a non-leaf resets itself and then
/// its children, left to right. `release` acts on this node only; use
/// [`release_tree`] to release a whole subtree in a fixed order.
///
/// # Thread Safety
///
/// The `Send` bound allows a tree to be moved to another thread, but a
/// tree is driven by one thread at a time and nothing inside it is shared.
pub trait Operator: Send {
    /// Pulls the next record.
    ///
    /// On [`OpStatus::Yielded`] the record has been written into `record`.
    /// Errors from children are returned unchanged.
    fn consume(
        &mut self,
        ctx: &mut PullContext<'_>,
        record: &mut Record,
    ) -> OperatorResult<OpStatus>;

    /// Returns this operator and its subtree to `Ready`, discarding cursor
    /// state.
    ///
    /// Built artifacts (compiled expressions, inline data) are kept.
    /// Children are reset after this node, left to right.
    fn reset(&mut self) -> OperatorResult<()>;

    /// Releases the resources owned by this operator.
    ///
    /// Must be safe to call more than once and on an operator that was
    /// never consumed. Children are not released here.
    fn release(&mut self);

    /// Returns the children of this operator, left to right.
    fn children(&self) -> &[BoxedOperator];

    /// Returns the children of this operator mutably, left to right.
    fn children_mut(&mut self) -> &mut [BoxedOperator];

    /// Returns the layout of the records this operator yields.
    fn layout(&self) -> Arc<RecordLayout>;

    /// Returns the current state of this operator.
    fn state(&self) -> OperatorState;

    /// Returns the name of this operator type.
    fn name(&self) -> &'static str;
}

/// A boxed operator for dynamic dispatch.
pub type BoxedOperator = Box<dyn Operator>;

/// Releases an operator and then its children, left to right.
pub fn release_tree(op: &mut dyn Operator) {
    op.release();
    for child in op.children_mut() {
        release_tree(child.as_mut());
    }
}

/// Base implementation for operators.
///
/// Tracks the state machine shared by every operator.
#[derive(Debug)]
pub struct OperatorBase {
    /// The output layout.
    layout: Arc<RecordLayout>,
    /// The current state.
    state: OperatorState,
    /// Number of records yielded (or rows produced, for the root).
    rows_produced: u64,
}

impl OperatorBase {
    /// Creates a new operator base with the given output layout.
    #[must_use]
    pub fn new(layout: Arc<RecordLayout>) -> Self {
        Self { layout, state: OperatorState::Ready, rows_produced: 0 }
    }

    /// Returns the output layout.
    #[must_use]
    pub fn layout(&self) -> Arc<RecordLayout> {
        Arc::clone(&self.layout)
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> OperatorState {
        self.state
    }

    /// Checks whether `consume` may do work.
    ///
    /// Returns `Ok(None)` when the operator is ready, `Ok(Some(Depleted))`
    /// when it is already exhausted, and an error if it failed or was
    /// released.
    pub fn check_consume(&self, name: &'static str) -> OperatorResult<Option<OpStatus>> {
        match self.state {
            OperatorState::Ready => Ok(None),
            OperatorState::Depleted => Ok(Some(OpStatus::Depleted)),
            OperatorState::Errored => Err(OperatorError::Errored(name)),
            OperatorState::Released => Err(OperatorError::Released(name)),
        }
    }

    /// Applies the state transition implied by a `consume` outcome and
    /// passes the outcome through.
    pub fn track(&mut self, outcome: OperatorResult<OpStatus>) -> OperatorResult<OpStatus> {
        match &outcome {
            Ok(OpStatus::Yielded) => {}
            Ok(OpStatus::Depleted | OpStatus::QuotaMet) => self.state = OperatorState::Depleted,
            Err(_) => self.state = OperatorState::Errored,
        }
        outcome
    }

    /// Returns the operator to `Ready` unless it has been released.
    pub fn reset(&mut self, name: &'static str) -> OperatorResult<()> {
        if self.state.is_released() {
            return Err(OperatorError::Released(name));
        }
        self.state = OperatorState::Ready;
        self.rows_produced = 0;
        Ok(())
    }

    /// Marks the operator released.
    ///
    /// Returns false if it already was, so callers can skip freeing twice.
    pub fn set_released(&mut self) -> bool {
        if self.state.is_released() {
            return false;
        }
        self.state = OperatorState::Released;
        true
    }

    /// Increments the rows produced counter.
    pub fn inc_rows_produced(&mut self) {
        self.rows_produced += 1;
    }

    /// Returns the number of rows produced since the last reset.
    #[must_use]
    pub const fn rows_produced(&self) -> u64 {
        self.rows_produced
    }
}
