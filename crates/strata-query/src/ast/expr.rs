//! Expression AST types.
//!
//! Expressions appear in RETURN clauses and are compiled into
//! [`ExprTree`](crate::exec::ExprTree)s when a plan is built.

use std::fmt;
use std::ops::Not;

/// A literal value in a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Null value.
    Null,
    /// Boolean value.
    Boolean(bool),
    /// 64-bit signed integer.
    Integer(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "null"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Float(fl) => write!(f, "{fl:?}"),
            Self::String(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
        }
    }
}

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // Arithmetic
    /// Addition (+). Also concatenates strings and lists.
    Add,
    /// Subtraction (-).
    Sub,
    /// Multiplication (*).
    Mul,
    /// Division (/).
    Div,
    /// Modulo (%).
    Mod,

    // Comparison
    /// Equal (=).
    Eq,
    /// Not equal (<>).
    NotEq,
    /// Less than (<).
    Lt,
    /// Less than or equal (<=).
    LtEq,
    /// Greater than (>).
    Gt,
    /// Greater than or equal (>=).
    GtEq,

    // Logical
    /// Logical AND.
    And,
    /// Logical OR.
    Or,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
        };
        write!(f, "{s}")
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical NOT.
    Not,
    /// Arithmetic negation (-).
    Neg,
    /// IS NULL.
    IsNull,
    /// IS NOT NULL.
    IsNotNull,
}

/// An expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Literal value.
    Literal(Literal),

    /// A variable bound by an earlier clause (e.g. `a` in `MATCH (a)`).
    Variable(String),

    /// Property access (`expr.key`).
    Property {
        /// The expression holding the node or relationship.
        expr: Box<Expr>,
        /// The property key.
        key: String,
    },

    /// Binary operation.
    BinaryOp {
        /// Left operand.
        left: Box<Expr>,
        /// Operator.
        op: BinaryOp,
        /// Right operand.
        right: Box<Expr>,
    },

    /// Unary operation.
    UnaryOp {
        /// Operator.
        op: UnaryOp,
        /// Operand.
        operand: Box<Expr>,
    },

    /// Scalar function call.
    Function {
        /// Function name as written in the query.
        name: String,
        /// Arguments.
        args: Vec<Expr>,
    },

    /// List literal (`[a, b, c]`).
    List(Vec<Expr>),
}

impl Expr {
    /// Creates a null literal expression.
    #[must_use]
    pub const fn null() -> Self {
        Self::Literal(Literal::Null)
    }

    /// Creates a literal boolean expression.
    #[must_use]
    pub const fn boolean(value: bool) -> Self {
        Self::Literal(Literal::Boolean(value))
    }

    /// Creates a literal integer expression.
    #[must_use]
    pub const fn integer(value: i64) -> Self {
        Self::Literal(Literal::Integer(value))
    }

    /// Creates a literal float expression.
    #[must_use]
    pub const fn float(value: f64) -> Self {
        Self::Literal(Literal::Float(value))
    }

    /// Creates a literal string expression.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(Literal::String(value.into()))
    }

    /// Creates a variable reference.
    #[must_use]
    pub fn variable(name: impl Into<String>) -> Self {
        Self::Variable(name.into())
    }

    /// Accesses a property of this expression.
    #[must_use]
    pub fn property(self, key: impl Into<String>) -> Self {
        Self::Property { expr: Box::new(self), key: key.into() }
    }

    /// Creates a binary operation expression.
    #[must_use]
    pub fn binary(left: Self, op: BinaryOp, right: Self) -> Self {
        Self::BinaryOp { left: Box::new(left), op, right: Box::new(right) }
    }

    /// Creates a unary operation expression.
    #[must_use]
    pub fn unary(op: UnaryOp, operand: Self) -> Self {
        Self::UnaryOp { op, operand: Box::new(operand) }
    }

    /// Creates a function call expression.
    #[must_use]
    pub fn function(name: impl Into<String>, args: Vec<Self>) -> Self {
        Self::Function { name: name.into(), args }
    }

    /// Creates a list expression.
    #[must_use]
    pub fn list(items: Vec<Self>) -> Self {
        Self::List(items)
    }

    /// Creates an addition expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn add(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Add, other)
    }

    /// Creates a subtraction expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn sub(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Sub, other)
    }

    /// Creates a multiplication expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn mul(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Mul, other)
    }

    /// Creates a division expression.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn div(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Div, other)
    }

    /// Creates a modulo expression.
    #[must_use]
    pub fn modulo(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Mod, other)
    }

    /// Creates an AND expression.
    #[must_use]
    pub fn and(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::And, other)
    }

    /// Creates an OR expression.
    #[must_use]
    pub fn or(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Or, other)
    }

    /// Creates a NOT expression.
    #[must_use]
    pub fn negate(self) -> Self {
        Self::unary(UnaryOp::Not, self)
    }

    /// Creates an arithmetic negation.
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn neg(self) -> Self {
        Self::unary(UnaryOp::Neg, self)
    }

    /// Creates an IS NULL expression.
    #[must_use]
    pub fn is_null(self) -> Self {
        Self::unary(UnaryOp::IsNull, self)
    }

    /// Creates an IS NOT NULL expression.
    #[must_use]
    pub fn is_not_null(self) -> Self {
        Self::unary(UnaryOp::IsNotNull, self)
    }

    /// Creates an equality expression.
    #[must_use]
    pub fn eq(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Eq, other)
    }

    /// Creates a not-equal expression.
    #[must_use]
    pub fn not_eq(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::NotEq, other)
    }

    /// Creates a less-than expression.
    #[must_use]
    pub fn lt(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Lt, other)
    }

    /// Creates a less-than-or-equal expression.
    #[must_use]
    pub fn lt_eq(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::LtEq, other)
    }

    /// Creates a greater-than expression.
    #[must_use]
    pub fn gt(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::Gt, other)
    }

    /// Creates a greater-than-or-equal expression.
    #[must_use]
    pub fn gt_eq(self, other: Self) -> Self {
        Self::binary(self, BinaryOp::GtEq, other)
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BinaryOp { .. } => write!(f, "({self})"),
            _ => write!(f, "{self}"),
        }
    }
}

/// Renders the expression the way it is written in a query.
///
/// The rendered text doubles as the default column name of an unaliased
/// return item, so `a.age + 1` renders exactly as `a.age + 1`.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Literal(lit) => write!(f, "{lit}"),
            Self::Variable(name) => write!(f, "{name}"),
            Self::Property { expr, key } => {
                expr.fmt_operand(f)?;
                write!(f, ".{key}")
            }
            Self::BinaryOp { left, op, right } => {
                left.fmt_operand(f)?;
                write!(f, " {op} ")?;
                right.fmt_operand(f)
            }
            Self::UnaryOp { op, operand } => match op {
                UnaryOp::Not => {
                    write!(f, "NOT ")?;
                    operand.fmt_operand(f)
                }
                UnaryOp::Neg => {
                    write!(f, "-")?;
                    operand.fmt_operand(f)
                }
                UnaryOp::IsNull => {
                    operand.fmt_operand(f)?;
                    write!(f, " IS NULL")
                }
                UnaryOp::IsNotNull => {
                    operand.fmt_operand(f)?;
                    write!(f, " IS NOT NULL")
                }
            },
            Self::Function { name, args } => {
                write!(f, "{name}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ")")
            }
            Self::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<f64> for Expr {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::string(value)
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::string(value)
    }
}

impl Not for Expr {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.negate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_arithmetic_renders_as_written() {
        let expr = Expr::variable("a").property("age").add(Expr::integer(1));
        assert_eq!(expr.to_string(), "a.age + 1");
    }

    #[test]
    fn nested_binary_operands_are_parenthesized() {
        let expr = Expr::variable("x").add(Expr::integer(1)).mul(Expr::integer(2));
        assert_eq!(expr.to_string(), "(x + 1) * 2");
    }

    #[test]
    fn function_and_list_rendering() {
        let expr = Expr::function("toUpper", vec![Expr::variable("a").property("name")]);
        assert_eq!(expr.to_string(), "toUpper(a.name)");

        let list = Expr::list(vec![Expr::integer(1), Expr::string("x"), Expr::null()]);
        assert_eq!(list.to_string(), "[1, 'x', null]");
    }

    #[test]
    fn unary_rendering() {
        assert_eq!((!Expr::boolean(true)).to_string(), "NOT true");
        assert_eq!(Expr::variable("n").is_null().to_string(), "n IS NULL");
        assert_eq!(Expr::integer(3).neg().to_string(), "-3");
        assert_eq!(Expr::float(1.0).to_string(), "1.0");
    }

    #[test]
    fn builder_produces_expected_tree() {
        let expr = Expr::variable("a").property("age").gt(Expr::integer(30));
        match expr {
            Expr::BinaryOp { op: BinaryOp::Gt, left, right } => {
                assert_eq!(*left, Expr::Property { expr: Box::new(Expr::variable("a")), key: "age".into() });
                assert_eq!(*right, Expr::integer(30));
            }
            other => panic!("unexpected expression {other:?}"),
        }
    }
}
