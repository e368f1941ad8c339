//! Values operator.
//!
//! Yields records from inline data without reading from a graph.

use std::sync::Arc;

use strata_core::Value;

use crate::error::OperatorResult;
use crate::exec::context::PullContext;
use crate::exec::operator::{BoxedOperator, OpStatus, Operator, OperatorBase, OperatorState};
use crate::exec::record::{Record, RecordLayout};

/// Values operator - yields records from inline data.
pub struct ValuesOp {
    /// Base operator state.
    base: OperatorBase,
    /// The records to yield.
    rows: Vec<Vec<Value>>,
    /// Index of the next record.
    current: usize,
}

impl ValuesOp {
    /// Creates a new values operator.
    #[must_use]
    pub fn new(layout: Arc<RecordLayout>, rows: Vec<Vec<Value>>) -> Self {
        Self { base: OperatorBase::new(layout), rows, current: 0 }
    }

    /// Creates a values operator binding the given variable names.
    #[must_use]
    pub fn with_variables<S: AsRef<str>>(
        variables: impl IntoIterator<Item = S>,
        rows: Vec<Vec<Value>>,
    ) -> Self {
        Self::new(Arc::new(RecordLayout::new(variables)), rows)
    }

    /// Returns the number of records yielded since the last reset.
    #[must_use]
    pub const fn yielded(&self) -> u64 {
        self.base.rows_produced()
    }
}

impl Operator for ValuesOp {
    fn consume(
        &mut self,
        _ctx: &mut PullContext<'_>,
        record: &mut Record,
    ) -> OperatorResult<OpStatus> {
        let name = self.name();
        if let Some(status) = self.base.check_consume(name)? {
            return Ok(status);
        }

        let Some(values) = self.rows.get(self.current) else {
            return self.base.track(Ok(OpStatus::Depleted));
        };

        record.fill(&self.base.layout(), values);
        self.current += 1;
        self.base.inc_rows_produced();
        Ok(OpStatus::Yielded)
    }

    fn reset(&mut self) -> OperatorResult<()> {
        let name = self.name();
        self.base.reset(name)?;
        self.current = 0;
        Ok(())
    }

    fn release(&mut self) {
        if self.base.set_released() {
            self.rows = Vec::new();
        }
    }

    fn children(&self) -> &[BoxedOperator] {
        &[]
    }

    fn children_mut(&mut self) -> &mut [BoxedOperator] {
        &mut []
    }

    fn layout(&self) -> Arc<RecordLayout> {
        self.base.layout()
    }

    fn state(&self) -> OperatorState {
        self.base.state()
    }

    fn name(&self) -> &'static str {
        "Values"
    }
}
