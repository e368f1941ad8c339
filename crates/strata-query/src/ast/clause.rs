//! RETURN clause types.

use super::expr::Expr;

/// An item in a RETURN clause.
#[derive(Debug, Clone, PartialEq)]
pub enum ReturnItem {
    /// A wildcard (*) - return all bound variables.
    Wildcard,
    /// An expression, optionally aliased.
    Expr {
        /// The expression to return.
        expr: Expr,
        /// Optional alias (AS name).
        alias: Option<String>,
    },
}

impl ReturnItem {
    /// Creates an unaliased return item.
    #[must_use]
    pub const fn expr(expr: Expr) -> Self {
        Self::Expr { expr, alias: None }
    }

    /// Creates an aliased return item.
    #[must_use]
    pub fn aliased(expr: Expr, alias: impl Into<String>) -> Self {
        Self::Expr { expr, alias: Some(alias.into()) }
    }

    /// Returns the result column name of an expression item.
    ///
    /// This is the alias when present, otherwise the expression text.
    /// Wildcards have no single name and return `None`.
    #[must_use]
    pub fn column_name(&self) -> Option<String> {
        match self {
            Self::Wildcard => None,
            Self::Expr { alias: Some(alias), .. } => Some(alias.clone()),
            Self::Expr { expr, alias: None } => Some(expr.to_string()),
        }
    }
}

impl From<Expr> for ReturnItem {
    fn from(expr: Expr) -> Self {
        Self::expr(expr)
    }
}

/// A RETURN clause: the ordered list of projected items.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnClause {
    /// The items in declaration order.
    pub items: Vec<ReturnItem>,
}

impl ReturnClause {
    /// Creates a RETURN clause from its items.
    #[must_use]
    pub const fn new(items: Vec<ReturnItem>) -> Self {
        Self { items }
    }

    /// Creates a RETURN clause of unaliased expressions.
    #[must_use]
    pub fn exprs(exprs: impl IntoIterator<Item = Expr>) -> Self {
        Self { items: exprs.into_iter().map(ReturnItem::expr).collect() }
    }

    /// Creates a `RETURN *` clause.
    #[must_use]
    pub fn wildcard() -> Self {
        Self { items: vec![ReturnItem::Wildcard] }
    }

    /// Appends an item.
    #[must_use]
    pub fn item(mut self, item: impl Into<ReturnItem>) -> Self {
        self.items.push(item.into());
        self
    }

    /// Returns the number of items as written (before wildcard expansion).
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the clause has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
