//! Expressions used by stats queries: column references, bound literals,
//! comparisons joined with AND/OR, and aggregate calls.

use model::core::value::Value;

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Identifier(Ident),

    /// A literal; always rendered as a bind parameter.
    Value(Value),

    BinaryOp(Box<BinaryOp>),

    /// An aggregate call such as `SUM("me"."cost")`.
    FunctionCall(FunctionCall),

    Alias { expr: Box<Expr>, alias: String },
}

impl Expr {
    pub fn compare(left: Expr, op: BinaryOperator, right: Expr) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp { left, op, right }))
    }

    /// Joins two conditions with `AND`.
    pub fn and(self, other: Expr) -> Expr {
        Expr::compare(self, BinaryOperator::And, other)
    }
}

/// `qualifier.name`, or a bare `name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub qualifier: Option<String>,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub left: Expr,
    pub op: BinaryOperator,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
}

impl BinaryOperator {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "=",
            BinaryOperator::NotEq => "<>",
            BinaryOperator::Lt => "<",
            BinaryOperator::LtEq => "<=",
            BinaryOperator::Gt => ">",
            BinaryOperator::GtEq => ">=",
            BinaryOperator::And => "AND",
            BinaryOperator::Or => "OR",
        }
    }
}
