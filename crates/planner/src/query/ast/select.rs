//! Defines the Abstract Syntax Tree (AST) for a SELECT query.

use crate::query::ast::{common::TableRef, expr::Expr};

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The list of columns or expressions to be returned.
    /// e.g., `id`, `name`, `COUNT(*)`
    pub columns: Vec<Expr>,

    /// The primary table for the query.
    /// e.g., `FROM users`
    pub from: Option<FromClause>,

    /// The WHERE clause condition.
    pub where_clause: Option<Expr>,

    /// The GROUP BY keys.
    pub group_by: Vec<Expr>,

    /// The ORDER BY keys, all ascending.
    pub order_by: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub alias: Option<String>,
}
