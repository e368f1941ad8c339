//! End-to-end tests for the produce-results pipeline.
//!
//! These tests drive operator trees through the [`Executor`] and check:
//! - Row contents and order
//! - Early termination when the result sink fills up
//! - Reset and re-drain
//! - Release on every exit path
//! - Plan construction errors

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use strata_core::Value;
use strata_query::ast::{Expr, ReturnClause, ReturnItem};
use strata_query::exec::{
    BoxedOperator, DrainOutcome, ExecutionConfig, Executor, OpStatus, Operator, OperatorBase,
    OperatorState, ProduceResultsOp, PullContext, Record, RecordLayout, ResultSet, SchemaCatalog,
    SchemaContext,
};
use strata_query::{BuildError, OperatorError, OperatorResult};

// ============================================================================
// Test Fixtures
// ============================================================================

fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Counters shared between a test and the operator it hands to a tree.
#[derive(Debug, Default)]
struct Counters {
    pulls: AtomicUsize,
    resets: AtomicUsize,
    releases: AtomicUsize,
}

impl Counters {
    fn pulls(&self) -> usize {
        self.pulls.load(Ordering::SeqCst)
    }

    fn resets(&self) -> usize {
        self.resets.load(Ordering::SeqCst)
    }

    fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// A leaf that yields fixed records and counts every lifecycle call.
///
/// Optionally fails on the pull with the given index.
struct CountingOp {
    base: OperatorBase,
    rows: Vec<Vec<Value>>,
    current: usize,
    fail_at: Option<usize>,
    counters: Arc<Counters>,
}

impl CountingOp {
    fn new(variables: &[&str], rows: Vec<Vec<Value>>) -> (Self, Arc<Counters>) {
        let counters = Arc::new(Counters::default());
        let op = Self {
            base: OperatorBase::new(Arc::new(RecordLayout::new(variables.iter().copied()))),
            rows,
            current: 0,
            fail_at: None,
            counters: Arc::clone(&counters),
        };
        (op, counters)
    }

    fn failing_at(mut self, pull: usize) -> Self {
        self.fail_at = Some(pull);
        self
    }
}

impl Operator for CountingOp {
    fn consume(
        &mut self,
        _ctx: &mut PullContext<'_>,
        record: &mut Record,
    ) -> OperatorResult<OpStatus> {
        if let Some(status) = self.base.check_consume("Counting")? {
            return Ok(status);
        }
        let pull = self.counters.pulls.fetch_add(1, Ordering::SeqCst);
        if self.fail_at == Some(pull) {
            return self.base.track(Err(OperatorError::Source("scan failed".to_string())));
        }
        match self.rows.get(self.current) {
            Some(values) => {
                record.fill(&self.base.layout(), values);
                self.current += 1;
                Ok(OpStatus::Yielded)
            }
            None => self.base.track(Ok(OpStatus::Depleted)),
        }
    }

    fn reset(&mut self) -> OperatorResult<()> {
        self.counters.resets.fetch_add(1, Ordering::SeqCst);
        self.base.reset("Counting")?;
        self.current = 0;
        Ok(())
    }

    fn release(&mut self) {
        if self.base.set_released() {
            self.counters.releases.fetch_add(1, Ordering::SeqCst);
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
        "Counting"
    }
}

fn person(id: i64, name: &str, age: i64) -> Value {
    let mut props = HashMap::new();
    props.insert("name".to_string(), Value::from(name));
    props.insert("age".to_string(), Value::Int(age));
    Value::node(id, vec!["Person".to_string()], props)
}

/// `MATCH (a:Person)` over Al (30) and Bo (40).
fn people() -> (CountingOp, Arc<Counters>) {
    CountingOp::new(&["a"], vec![vec![person(1, "Al", 30)], vec![person(2, "Bo", 40)]])
}

/// `RETURN a.name, a.age + 1`
fn name_and_next_age() -> ReturnClause {
    ReturnClause::exprs([
        Expr::variable("a").property("name"),
        Expr::variable("a").property("age").add(Expr::integer(1)),
    ])
}

fn build(child: CountingOp, clause: &ReturnClause) -> ProduceResultsOp {
    ProduceResultsOp::new(clause, &SchemaContext::default(), Some(Box::new(child))).unwrap()
}

// ============================================================================
// Row Production
// ============================================================================

mod rows {
    use super::*;

    #[test]
    fn capacity_ten_returns_every_row() {
        init_tracing();
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        let mut result = ResultSet::with_limit(exec.layout(), 10);

        assert_eq!(exec.run(&mut result).unwrap(), DrainOutcome::Exhausted);
        assert_eq!(
            result.to_values(),
            vec![
                vec![Value::from("Al"), Value::Int(31)],
                vec![Value::from("Bo"), Value::Int(41)],
            ]
        );
        // Two records plus end-of-stream.
        assert_eq!(counters.pulls(), 3);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn capacity_one_stops_without_pulling_again() {
        init_tracing();
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        let mut result = ResultSet::with_limit(exec.layout(), 1);

        assert_eq!(exec.run(&mut result).unwrap(), DrainOutcome::QuotaMet);
        assert_eq!(result.to_values(), vec![vec![Value::from("Al"), Value::Int(31)]]);
        assert_eq!(counters.pulls(), 1);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn full_sink_from_the_start_never_pulls() {
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        let mut result = ResultSet::with_limit(exec.layout(), 0);

        assert_eq!(exec.run(&mut result).unwrap(), DrainOutcome::QuotaMet);
        assert!(result.is_empty());
        assert_eq!(counters.pulls(), 0);
    }

    #[test]
    fn empty_input_produces_no_rows() {
        let (child, counters) = CountingOp::new(&["a"], Vec::new());
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));

        let result = exec.execute().unwrap();
        assert!(result.is_empty());
        assert_eq!(result.columns(), vec!["a.name", "a.age + 1"]);
        assert_eq!(counters.pulls(), 1);
    }

    #[test]
    fn missing_properties_become_null() {
        let (child, _) = CountingOp::new(&["a"], vec![vec![Value::node(3, vec![], HashMap::new())]]);
        let clause = ReturnClause::exprs([Expr::variable("a").property("name")]);
        let result = Executor::new(Box::new(build(child, &clause))).execute().unwrap();
        assert_eq!(result.to_values(), vec![vec![Value::Null]]);
    }

    #[test]
    fn aliases_and_functions() {
        let (child, _) = people();
        let clause = ReturnClause::default()
            .item(ReturnItem::aliased(
                Expr::function("toUpper", vec![Expr::variable("a").property("name")]),
                "shout",
            ))
            .item(ReturnItem::aliased(Expr::function("id", vec![Expr::variable("a")]), "id"));

        let result = Executor::new(Box::new(build(child, &clause))).execute().unwrap();
        assert_eq!(result.columns(), vec!["shout", "id"]);
        assert_eq!(
            result.to_values(),
            vec![vec![Value::from("AL"), Value::Int(1)], vec![Value::from("BO"), Value::Int(2)]]
        );
    }

    #[test]
    fn childless_return() {
        let clause = ReturnClause::exprs([
            Expr::integer(1).add(Expr::integer(2)),
            Expr::string("a").add(Expr::string("b")),
        ]);
        let root = ProduceResultsOp::new(&clause, &SchemaContext::default(), None).unwrap();
        let mut exec = Executor::new(Box::new(root));
        let mut result = exec.result_set();

        assert_eq!(exec.step(&mut result).unwrap(), OpStatus::Depleted);
        assert_eq!(exec.step(&mut result).unwrap(), OpStatus::Depleted);
        assert_eq!(result.columns(), vec!["1 + 2", "'a' + 'b'"]);
        assert_eq!(result.to_values(), vec![vec![Value::Int(3), Value::from("ab")]]);
    }

    #[test]
    fn results_serialize_to_json() {
        let (child, _) = people();
        let result = Executor::new(Box::new(build(child, &name_and_next_age()))).execute().unwrap();

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["columns"], serde_json::json!(["a.name", "a.age + 1"]));
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(2));
        assert_eq!(json["rows"][1][1], serde_json::json!({"Int": 41}));
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

mod lifecycle {
    use super::*;

    #[test]
    fn reset_then_drain_yields_same_rows() {
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));

        let mut first = exec.result_set();
        assert_eq!(exec.drain(&mut first).unwrap(), DrainOutcome::Exhausted);

        exec.reset().unwrap();
        assert_eq!(counters.resets(), 1);
        assert_eq!(exec.state(), OperatorState::Ready);

        let mut second = exec.result_set();
        assert_eq!(exec.drain(&mut second).unwrap(), DrainOutcome::Exhausted);
        assert_eq!(first.to_values(), second.to_values());
        assert_eq!(counters.releases(), 0);
    }

    #[test]
    fn operator_reset_reaches_the_child() {
        let (child, counters) = people();
        let mut root: BoxedOperator = Box::new(build(child, &name_and_next_age()));

        let drain = |root: &mut BoxedOperator| {
            let mut rs = ResultSet::new(root.layout());
            let mut record = Record::empty();
            let mut ctx = PullContext::new(&mut rs);
            while root.consume(&mut ctx, &mut record).unwrap() == OpStatus::Yielded {}
            rs.to_values()
        };

        let first = drain(&mut root);
        root.reset().unwrap();
        assert_eq!(counters.resets(), 1);
        assert_eq!(root.children()[0].state(), OperatorState::Ready);

        let second = drain(&mut root);
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn reset_after_quota_met_allows_a_fresh_run() {
        let (child, _) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));

        let mut result = ResultSet::with_limit(exec.layout(), 1);
        assert_eq!(exec.drain(&mut result).unwrap(), DrainOutcome::QuotaMet);

        exec.reset().unwrap();
        result.clear();
        assert_eq!(exec.drain(&mut result).unwrap(), DrainOutcome::QuotaMet);
        assert_eq!(result.to_values(), vec![vec![Value::from("Al"), Value::Int(31)]]);
    }

    #[test]
    fn release_without_consuming() {
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));

        exec.release();
        exec.release();
        drop(exec);
        assert_eq!(counters.pulls(), 0);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn drop_releases_once() {
        let (child, counters) = people();
        {
            let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
            let mut result = exec.result_set();
            exec.step(&mut result).unwrap();
        }
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn run_then_drop_releases_once() {
        let (child, counters) = people();
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        let mut result = exec.result_set();
        exec.run(&mut result).unwrap();
        drop(exec);
        assert_eq!(counters.releases(), 1);
    }

    #[test]
    fn child_error_propagates_and_tree_is_released() {
        let (child, counters) = people();
        let child = child.failing_at(1);
        let mut exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        let mut result = exec.result_set();

        let err = exec.run(&mut result).unwrap_err();
        assert_eq!(err, OperatorError::Source("scan failed".to_string()));
        // The row produced before the failure stays in the sink.
        assert_eq!(result.len(), 1);
        assert_eq!(counters.releases(), 1);
        assert!(exec.is_released());
    }

    #[test]
    fn stats_track_pulls_and_rows() {
        let (child, _) = people();
        let config = ExecutionConfig::new().with_max_result_rows(1).with_stats();
        let mut exec = Executor::with_config(Box::new(build(child, &name_and_next_age())), config);

        let result = exec.execute().unwrap();
        assert_eq!(result.len(), 1);
        let stats = exec.stats().unwrap();
        assert_eq!(stats.records_pulled(), 1);
        assert_eq!(stats.rows_produced(), 1);
    }
}

// ============================================================================
// Plan Construction
// ============================================================================

mod construction {
    use super::*;

    fn build_err(clause: &ReturnClause, schema: &SchemaContext) -> (BuildError, Arc<Counters>) {
        let (child, counters) = people();
        let err = ProduceResultsOp::new(clause, schema, Some(Box::new(child))).err().unwrap();
        (err, counters)
    }

    #[test]
    fn unknown_variable_fails_before_any_pull() {
        let clause = ReturnClause::exprs([Expr::variable("b").property("name")]);
        let (err, counters) = build_err(&clause, &SchemaContext::default());
        assert_eq!(err, BuildError::UnknownVariable("b".to_string()));
        assert_eq!(counters.pulls(), 0);
    }

    #[test]
    fn unknown_function() {
        let clause = ReturnClause::exprs([Expr::function("frobnicate", vec![Expr::variable("a")])]);
        let (err, _) = build_err(&clause, &SchemaContext::default());
        assert_eq!(err, BuildError::UnknownFunction("frobnicate".to_string()));
    }

    #[test]
    fn wrong_arity() {
        let clause = ReturnClause::exprs([Expr::function("size", vec![])]);
        let (err, _) = build_err(&clause, &SchemaContext::default());
        assert!(matches!(err, BuildError::Arity { found: 0, .. }));
    }

    #[test]
    fn unknown_property_in_closed_catalog() {
        let schema = SchemaContext::new(SchemaCatalog::closed(["name", "age"]), Default::default());
        let clause = ReturnClause::exprs([Expr::variable("a").property("email")]);
        let (err, _) = build_err(&clause, &schema);
        assert_eq!(err, BuildError::UnknownProperty("email".to_string()));

        let (child, _) = people();
        assert!(ProduceResultsOp::new(&name_and_next_age(), &schema, Some(Box::new(child))).is_ok());
    }

    #[test]
    fn empty_return() {
        let (err, _) = build_err(&ReturnClause::default(), &SchemaContext::default());
        assert_eq!(err, BuildError::EmptyReturn);
    }

    #[test]
    fn duplicate_columns() {
        let clause = ReturnClause::default()
            .item(ReturnItem::aliased(Expr::integer(1), "x"))
            .item(ReturnItem::aliased(Expr::integer(2), "x"));
        let (err, _) = build_err(&clause, &SchemaContext::default());
        assert_eq!(err, BuildError::DuplicateColumn("x".to_string()));
    }

    #[test]
    fn explain_shows_tree() {
        let (child, _) = people();
        let exec = Executor::new(Box::new(build(child, &name_and_next_age())));
        assert_eq!(exec.explain(), "Produce Results [a.name, a.age + 1]\n  Counting [a]\n");
    }
}
