//! Produce results operator.
//!
//! The root of every read query. Each pull takes one record from the child,
//! evaluates the return expressions against it and appends the resulting
//! row to the caller's result sink.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use crate::ast::{ReturnClause, ReturnItem};
use crate::error::{BuildError, BuildResult, OperatorError, OperatorResult};
use crate::exec::context::PullContext;
use crate::exec::expression::ExprTree;
use crate::exec::operator::{BoxedOperator, OpStatus, Operator, OperatorBase, OperatorState};
use crate::exec::record::{Record, RecordLayout};
use crate::exec::resolve::SchemaContext;
use crate::exec::result::{OutputRow, SinkError};

/// Produce results operator - projects child records into result rows.
///
/// The output layout names the result columns: each item's alias, or its
/// expression text when unaliased.
///
/// Without a child the operator evaluates its expressions once against an
/// empty record (`RETURN 1 + 2`) and then reports depletion.
pub struct ProduceResultsOp {
    /// Base operator state. Its layout holds the result columns.
    base: OperatorBase,
    /// The input, if any.
    child: Option<BoxedOperator>,
    /// One compiled expression per result column, in column order.
    exprs: Box<[ExprTree]>,
}

impl ProduceResultsOp {
    /// Builds the operator for a return clause.
    ///
    /// Variables resolve against the child's layout, so the child must be
    /// supplied here. `RETURN *` expands to every variable the child binds.
    ///
    /// # Errors
    ///
    /// Returns an error if the clause projects nothing, if two columns
    /// share a name, or if any expression fails to compile.
    pub fn new(
        clause: &ReturnClause,
        schema: &SchemaContext,
        child: Option<BoxedOperator>,
    ) -> BuildResult<Self> {
        let input = child.as_ref().map_or_else(RecordLayout::shared_empty, |c| c.layout());
        let ctx = schema.resolver(&input);

        let mut columns = Vec::with_capacity(clause.len());
        let mut exprs = Vec::with_capacity(clause.len());
        for item in &clause.items {
            match item {
                ReturnItem::Wildcard => {
                    for (index, name) in input.names().into_iter().enumerate() {
                        columns.push(name.to_string());
                        exprs.push(ExprTree::Slot(index));
                    }
                }
                ReturnItem::Expr { expr, .. } => {
                    exprs.push(ExprTree::build(expr, &ctx)?);
                    columns.extend(item.column_name());
                }
            }
        }

        if exprs.is_empty() {
            return Err(BuildError::EmptyReturn);
        }

        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(BuildError::DuplicateColumn(column.clone()));
            }
        }

        debug!(
            columns = ?columns,
            child = child.as_ref().map(|c| c.name()),
            "built produce results"
        );

        Ok(Self {
            base: OperatorBase::new(Arc::new(RecordLayout::new(columns))),
            child,
            exprs: exprs.into_boxed_slice(),
        })
    }

    /// Returns the compiled expressions, in column order.
    #[must_use]
    pub fn expressions(&self) -> &[ExprTree] {
        &self.exprs
    }

    /// Returns the result column names.
    #[must_use]
    pub fn columns(&self) -> Vec<String> {
        self.base.layout().names().into_iter().map(str::to_string).collect()
    }

    /// Returns the child operator, if any.
    #[must_use]
    pub fn child(&self) -> Option<&dyn Operator> {
        self.child.as_deref()
    }

    /// Returns the number of rows appended since the last reset.
    #[must_use]
    pub const fn rows_produced(&self) -> u64 {
        self.base.rows_produced()
    }

    /// Pulls one record and turns it into a result row.
    fn produce(
        &mut self,
        ctx: &mut PullContext<'_>,
        record: &mut Record,
    ) -> OperatorResult<OpStatus> {
        let status = match self.child.as_mut() {
            Some(child) => {
                let status = child.consume(ctx, record)?;
                if status != OpStatus::Yielded {
                    return Ok(status);
                }
                ctx.record_pulled();
                status
            }
            None => {
                *record = Record::empty();
                OpStatus::Depleted
            }
        };

        let row = OutputRow::new(self.exprs.iter().map(|e| e.evaluate(record)).collect());

        match ctx.sink_mut().append(row) {
            Ok(()) => {
                self.base.inc_rows_produced();
                ctx.record_row_produced();
                Ok(status)
            }
            Err(SinkError::Full { capacity }) => {
                trace!(capacity, "result sink rejected row as full");
                Ok(OpStatus::QuotaMet)
            }
            Err(SinkError::Internal(message)) => {
                warn!(error = %message, "result sink failed");
                Err(OperatorError::Sink(message))
            }
        }
    }
}

impl Operator for ProduceResultsOp {
    fn consume(
        &mut self,
        ctx: &mut PullContext<'_>,
        record: &mut Record,
    ) -> OperatorResult<OpStatus> {
        let name = self.name();
        if let Some(status) = self.base.check_consume(name)? {
            return Ok(status);
        }

        // A full sink ends the query before the child does any more work.
        if ctx.sink().is_full() {
            trace!(rows = self.base.rows_produced(), "result sink full, not pulling");
            return self.base.track(Ok(OpStatus::QuotaMet));
        }

        let outcome = self.produce(ctx, record);
        self.base.track(outcome)
    }

    fn reset(&mut self) -> OperatorResult<()> {
        let name = self.name();
        self.base.reset(name)?;
        if let Some(child) = self.child.as_mut() {
            child.reset()?;
        }
        Ok(())
    }

    fn release(&mut self) {
        if !self.base.set_released() {
            return;
        }
        let exprs = std::mem::take(&mut self.exprs);
        debug!(expressions = exprs.len(), "releasing produce results");
        drop(exprs);
    }

    fn children(&self) -> &[BoxedOperator] {
        self.child.as_slice()
    }

    fn children_mut(&mut self) -> &mut [BoxedOperator] {
        self.child.as_mut_slice()
    }

    fn layout(&self) -> Arc<RecordLayout> {
        self.base.layout()
    }

    fn state(&self) -> OperatorState {
        self.base.state()
    }

    fn name(&self) -> &'static str {
        "Produce Results"
    }
}
