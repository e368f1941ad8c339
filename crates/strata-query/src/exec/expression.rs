//! Compiled return expressions.
//!
//! An [`Expr`] is compiled into an [`ExprTree`] once, when the plan is
//! built. Compilation resolves variables to record slots, checks property
//! keys and binds function calls, so every naming error is reported before
//! the first record is pulled.
//!
//! # Evaluation semantics
//!
//! Evaluation never fails. Following three-valued logic:
//! - Any arithmetic or comparison with a NULL operand yields NULL
//! - `NULL AND false` is false, `NULL OR true` is true
//! - Operands of the wrong type yield NULL
//! - Integer overflow and integer division by zero yield NULL
//! - Missing properties yield NULL

use std::cmp::Ordering;

use strata_core::Value;

use crate::ast::{BinaryOp, Expr, Literal, UnaryOp};
use crate::error::BuildResult;

use super::functions::FunctionDef;
use super::record::Record;
use super::resolve::ResolutionContext;

/// A compiled expression, ready to evaluate against records.
#[derive(Debug, Clone)]
pub enum ExprTree {
    /// A constant.
    Constant(Value),
    /// The value in a record slot.
    Slot(usize),
    /// A property of a node or relationship.
    Property {
        /// The expression producing the node or relationship.
        target: Box<ExprTree>,
        /// The property key.
        key: String,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left: Box<ExprTree>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<ExprTree>,
    },
    /// A unary operation.
    Unary {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<ExprTree>,
    },
    /// A scalar function call.
    Call {
        /// The bound function.
        def: FunctionDef,
        /// Arguments.
        args: Vec<ExprTree>,
    },
    /// A list built from its items.
    List(Vec<ExprTree>),
}

impl ExprTree {
    /// Compiles an expression.
    ///
    /// # Errors
    ///
    /// Returns an error if the expression names an unbound variable, an
    /// unknown function, a function with the wrong number of arguments, or
    /// a property key a closed catalog does not know.
    pub fn build(expr: &Expr, ctx: &ResolutionContext<'_>) -> BuildResult<Self> {
        Ok(match expr {
            Expr::Literal(lit) => Self::Constant(literal_to_value(lit)),
            Expr::Variable(name) => Self::Slot(ctx.resolve_variable(name)?),
            Expr::Property { expr, key } => {
                let target = Self::build(expr, ctx)?;
                ctx.catalog.check_property_key(key)?;
                Self::Property { target: Box::new(target), key: key.clone() }
            }
            Expr::BinaryOp { left, op, right } => Self::Binary {
                left: Box::new(Self::build(left, ctx)?),
                op: *op,
                right: Box::new(Self::build(right, ctx)?),
            },
            Expr::UnaryOp { op, operand } => {
                Self::Unary { op: *op, operand: Box::new(Self::build(operand, ctx)?) }
            }
            Expr::Function { name, args } => {
                let def = ctx.functions.resolve(name, args.len())?;
                let args = args.iter().map(|a| Self::build(a, ctx)).collect::<BuildResult<_>>()?;
                Self::Call { def, args }
            }
            Expr::List(items) => {
                Self::List(items.iter().map(|i| Self::build(i, ctx)).collect::<BuildResult<_>>()?)
            }
        })
    }

    /// Evaluates the expression against a record.
    #[must_use]
    pub fn evaluate(&self, record: &Record) -> Value {
        match self {
            Self::Constant(value) => value.clone(),
            // Slots are resolved against the child's layout, so a miss only
            // happens if a child yields a record of another shape.
            Self::Slot(index) => record.get(*index).cloned().unwrap_or(Value::Null),
            Self::Property { target, key } => {
                target.evaluate(record).property(key).cloned().unwrap_or(Value::Null)
            }
            Self::Binary { left, op: BinaryOp::And, right } => {
                let left = left.evaluate(record);
                if matches!(left, Value::Bool(false)) {
                    return Value::Bool(false);
                }
                logical_and(&left, &right.evaluate(record))
            }
            Self::Binary { left, op: BinaryOp::Or, right } => {
                let left = left.evaluate(record);
                if matches!(left, Value::Bool(true)) {
                    return Value::Bool(true);
                }
                logical_or(&left, &right.evaluate(record))
            }
            Self::Binary { left, op, right } => {
                evaluate_binary_op(&left.evaluate(record), *op, &right.evaluate(record))
            }
            Self::Unary { op, operand } => evaluate_unary_op(*op, &operand.evaluate(record)),
            Self::Call { def, args } => {
                let values: Vec<Value> = args.iter().map(|a| a.evaluate(record)).collect();
                (def.func)(&values)
            }
            Self::List(items) => Value::Array(items.iter().map(|i| i.evaluate(record)).collect()),
        }
    }
}

/// Converts a literal to a value.
fn literal_to_value(lit: &Literal) -> Value {
    match lit {
        Literal::Null => Value::Null,
        Literal::Boolean(b) => Value::Bool(*b),
        Literal::Integer(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::String(s) => Value::String(s.clone()),
    }
}

fn logical_and(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Bool(false), _) | (_, Value::Bool(false)) => Value::Bool(false),
        (Value::Bool(true), Value::Bool(true)) => Value::Bool(true),
        _ => Value::Null,
    }
}

fn logical_or(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::Bool(true), _) | (_, Value::Bool(true)) => Value::Bool(true),
        (Value::Bool(false), Value::Bool(false)) => Value::Bool(false),
        _ => Value::Null,
    }
}

/// Evaluates a non-logical binary operation.
fn evaluate_binary_op(left: &Value, op: BinaryOp, right: &Value) -> Value {
    if left.is_null() || right.is_null() {
        return Value::Null;
    }

    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        BinaryOp::Div => arithmetic(left, right, i64::checked_div, |a, b| a / b),
        BinaryOp::Mod => arithmetic(left, right, i64::checked_rem, |a, b| a % b),
        BinaryOp::Eq => values_equal(left, right).map_or(Value::Null, Value::Bool),
        BinaryOp::NotEq => values_equal(left, right).map_or(Value::Null, |eq| Value::Bool(!eq)),
        BinaryOp::Lt => compare(left, right, Ordering::is_lt),
        BinaryOp::LtEq => compare(left, right, Ordering::is_le),
        BinaryOp::Gt => compare(left, right, Ordering::is_gt),
        BinaryOp::GtEq => compare(left, right, Ordering::is_ge),
        BinaryOp::And => logical_and(left, right),
        BinaryOp::Or => logical_or(left, right),
    }
}

/// `+` on numbers, strings and lists.
fn add(left: &Value, right: &Value) -> Value {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Value::String(format!("{a}{b}")),
        (Value::String(a), b @ (Value::Int(_) | Value::Float(_) | Value::Bool(_))) => {
            Value::String(format!("{a}{b}"))
        }
        (a @ (Value::Int(_) | Value::Float(_) | Value::Bool(_)), Value::String(b)) => {
            Value::String(format!("{a}{b}"))
        }
        (Value::Array(a), Value::Array(b)) => {
            Value::Array(a.iter().chain(b.iter()).cloned().collect())
        }
        (Value::Array(a), b) => {
            let mut items = a.clone();
            items.push(b.clone());
            Value::Array(items)
        }
        (a, Value::Array(b)) => {
            let mut items = Vec::with_capacity(b.len() + 1);
            items.push(a.clone());
            items.extend(b.iter().cloned());
            Value::Array(items)
        }
        _ => arithmetic(left, right, i64::checked_add, |a, b| a + b),
    }
}

/// Numeric arithmetic with integer overflow mapped to NULL.
///
/// Mixed integer/float operands are computed as floats.
#[allow(clippy::cast_precision_loss)]
fn arithmetic(
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> Value {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => int_op(*a, *b).map_or(Value::Null, Value::Int),
        (Value::Float(a), Value::Float(b)) => Value::Float(float_op(*a, *b)),
        (Value::Int(a), Value::Float(b)) => Value::Float(float_op(*a as f64, *b)),
        (Value::Float(a), Value::Int(b)) => Value::Float(float_op(*a, *b as f64)),
        _ => Value::Null,
    }
}

/// Equality between two non-null values.
///
/// Returns `None` when the comparison is undefined (a list containing NULL
/// compared against an otherwise equal list).
#[allow(clippy::cast_precision_loss)]
fn values_equal(left: &Value, right: &Value) -> Option<bool> {
    match (left, right) {
        (Value::Null, _) | (_, Value::Null) => None,
        (Value::Int(a), Value::Float(b)) | (Value::Float(b), Value::Int(a)) => {
            Some((*a as f64) == *b)
        }
        (Value::Array(a), Value::Array(b)) => {
            if a.len() != b.len() {
                return Some(false);
            }
            let mut undefined = false;
            for (x, y) in a.iter().zip(b) {
                match values_equal(x, y) {
                    Some(false) => return Some(false),
                    None => undefined = true,
                    Some(true) => {}
                }
            }
            if undefined {
                None
            } else {
                Some(true)
            }
        }
        (Value::Node { id: a, .. }, Value::Node { id: b, .. })
        | (Value::Edge { id: a, .. }, Value::Edge { id: b, .. }) => Some(a == b),
        _ => Some(left == right),
    }
}

/// Orders two values of comparable types.
#[allow(clippy::cast_precision_loss)]
fn compare_values(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
        (Value::Float(a), Value::Float(b)) => a.partial_cmp(b),
        (Value::Int(a), Value::Float(b)) => (*a as f64).partial_cmp(b),
        (Value::Float(a), Value::Int(b)) => a.partial_cmp(&(*b as f64)),
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Bool(a), Value::Bool(b)) => Some(a.cmp(b)),
        _ => None,
    }
}

fn compare(left: &Value, right: &Value, test: fn(Ordering) -> bool) -> Value {
    compare_values(left, right).map_or(Value::Null, |ord| Value::Bool(test(ord)))
}

/// Evaluates a unary operation.
fn evaluate_unary_op(op: UnaryOp, value: &Value) -> Value {
    match op {
        UnaryOp::IsNull => Value::Bool(value.is_null()),
        UnaryOp::IsNotNull => Value::Bool(!value.is_null()),
        UnaryOp::Not => match value {
            Value::Bool(b) => Value::Bool(!b),
            _ => Value::Null,
        },
        UnaryOp::Neg => match value {
            Value::Int(i) => i.checked_neg().map_or(Value::Null, Value::Int),
            Value::Float(f) => Value::Float(-f),
            _ => Value::Null,
        },
    }
}
