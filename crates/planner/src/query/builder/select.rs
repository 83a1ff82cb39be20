//! Typestate builder for `Select` ASTs: `select`, then `from`, then the
//! optional clauses.

use crate::query::ast::{
    common::TableRef,
    expr::Expr,
    select::{FromClause, Select},
};
use std::marker::PhantomData;

/// The initial state of the builder before any clauses have been added.
#[derive(Debug, Default, Clone)]
pub struct InitialState;

/// The state after the `SELECT` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct SelectState;

/// The state after the `FROM` clause has been added.
#[derive(Debug, Default, Clone)]
pub struct FromState;

#[derive(Debug, Clone)]
pub struct SelectBuilder<State> {
    pub ast: Select,
    _state: PhantomData<State>,
}

impl Default for SelectBuilder<InitialState> {
    fn default() -> Self {
        Self::new()
    }
}

/// Implementation for the initial state of the builder.
impl SelectBuilder<InitialState> {
    pub fn new() -> Self {
        Self {
            ast: Select::default(),
            _state: PhantomData,
        }
    }

    /// Adds a `SELECT` clause with a list of columns.
    /// This is the entry point for building a select query.
    pub fn select(mut self, columns: Vec<Expr>) -> SelectBuilder<SelectState> {
        self.ast.columns = columns;
        SelectBuilder {
            ast: self.ast,
            _state: PhantomData,
        }
    }
}

/// Implementation for the state after `SELECT` has been called.
/// The only valid next step is to specify a `FROM` table.
impl SelectBuilder<SelectState> {
    /// Adds a `FROM` clause specifying the primary table.
    pub fn from(mut self, table: TableRef, alias: Option<&str>) -> SelectBuilder<FromState> {
        self.ast.from = Some(FromClause {
            table,
            alias: alias.map(String::from),
        });
        SelectBuilder {
            ast: self.ast,
            _state: PhantomData,
        }
    }
}

/// Implementation for the state after `FROM` has been called.
/// From here, we can add optional clauses like `WHERE`, `GROUP BY`, etc.
impl SelectBuilder<FromState> {
    /// Adds a `WHERE` condition, AND-ing it with any condition already present.
    pub fn where_clause(mut self, condition: Expr) -> Self {
        self.ast.where_clause = Some(match self.ast.where_clause.take() {
            Some(existing) => existing.and(condition),
            None => condition,
        });
        self
    }

    /// Adds `GROUP BY` keys to the query.
    pub fn group_by(mut self, keys: Vec<Expr>) -> Self {
        self.ast.group_by.extend(keys);
        self
    }

    /// Adds ascending `ORDER BY` keys to the query.
    pub fn order_by(mut self, keys: Vec<Expr>) -> Self {
        self.ast.order_by.extend(keys);
        self
    }

    /// Finalizes and returns the constructed `Select` AST.
    pub fn build(self) -> Select {
        self.ast
    }
}

#[cfg(test)]
mod tests {
    use crate::query::{
        ast::{
            common::TableRef,
            expr::{BinaryOp, BinaryOperator, Expr, FunctionCall},
        },
        builder::select::SelectBuilder,
        ident, qualified_ident, value,
    };
    use model::core::value::Value;

    fn table(name: &str) -> TableRef {
        TableRef {
            schema: None,
            name: name.to_string(),
        }
    }

    #[test]
    fn test_build_simple_select() {
        let ast = SelectBuilder::new()
            .select(vec![ident("id"), ident("name")])
            .from(table("users"), None)
            .build();

        assert_eq!(ast.columns, vec![ident("id"), ident("name")]);
        assert_eq!(ast.from.unwrap().table.name, "users");
        assert!(ast.where_clause.is_none());
        assert!(ast.group_by.is_empty());
    }

    #[test]
    fn test_repeated_where_is_and_ed() {
        let status = Expr::BinaryOp(Box::new(BinaryOp {
            left: qualified_ident("u", "status"),
            op: BinaryOperator::Eq,
            right: value(Value::String("active".to_string())),
        }));
        let age = Expr::BinaryOp(Box::new(BinaryOp {
            left: qualified_ident("u", "age"),
            op: BinaryOperator::Gt,
            right: value(Value::Int(18)),
        }));

        let ast = SelectBuilder::new()
            .select(vec![ident("email")])
            .from(table("users"), Some("u"))
            .where_clause(status.clone())
            .where_clause(age.clone())
            .build();

        assert_eq!(ast.from.unwrap().alias, Some("u".to_string()));
        assert_eq!(ast.where_clause, Some(status.and(age)));
    }

    #[test]
    fn test_build_with_group_and_ordering() {
        let count = Expr::FunctionCall(FunctionCall {
            name: "COUNT".to_string(),
            args: vec![qualified_ident("p", "id")],
        });

        let ast = SelectBuilder::new()
            .select(vec![qualified_ident("p", "user_id"), count])
            .from(table("posts"), Some("p"))
            .group_by(vec![qualified_ident("p", "user_id")])
            .order_by(vec![qualified_ident("p", "user_id")])
            .build();

        assert_eq!(ast.group_by, vec![qualified_ident("p", "user_id")]);
        assert_eq!(ast.order_by, vec![qualified_ident("p", "user_id")]);
    }
}
