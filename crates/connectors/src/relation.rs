//! The relation boundary: anything that knows its current alias and can
//! search with a query descriptor gets `simple_stats` for free.

use crate::{result_set::ResultSet, sql::base::error::DbError};
use async_trait::async_trait;
use model::records::row::RowData;
use planner::{
    query::ast::{common::TableRef, expr::Expr},
    stats::{ArgumentError, QueryDescriptor, StatsArg, StatsQueryBuilder},
    table_ref,
};
use std::sync::Arc;

/// Alias given to a relation's base table unless the caller picks another.
pub const DEFAULT_ALIAS: &str = "me";

/// Everything an executor needs to run one stats query.
#[derive(Debug, Clone, PartialEq)]
pub struct StatsQuery {
    pub table: TableRef,
    pub alias: String,
    pub filter: Option<Expr>,
    pub descriptor: QueryDescriptor,
}

#[async_trait]
pub trait StatsExecutor: Send + Sync {
    async fn execute(&self, query: &StatsQuery) -> Result<Vec<RowData>, DbError>;
}

pub trait Relation: Send + Sync {
    fn current_alias(&self) -> &str;

    /// Prepares a grouped query. Nothing runs until the result set is
    /// consumed.
    fn search(&self, filter: Option<Expr>, descriptor: QueryDescriptor) -> ResultSet;
}

pub trait SimpleStats: Relation {
    /// Groups by the given columns and aggregates, e.g.
    /// `simple_stats(["name"])` or
    /// `simple_stats([StatsArg::aggregate_as("sum", "cost", "total_cost")])`.
    fn simple_stats<I>(&self, args: I) -> Result<ResultSet, ArgumentError>
    where
        I: IntoIterator,
        I::Item: Into<StatsArg>,
    {
        let descriptor = StatsQueryBuilder::new(self.current_alias()).build(args)?;
        Ok(self.search(None, descriptor))
    }
}

impl<R: Relation + ?Sized> SimpleStats for R {}

/// A table, optionally narrowed by a base filter, backed by an executor.
#[derive(Clone)]
pub struct TableRelation {
    table: TableRef,
    alias: String,
    filter: Option<Expr>,
    executor: Arc<dyn StatsExecutor>,
}

impl TableRelation {
    pub fn new(table: &str, executor: Arc<dyn StatsExecutor>) -> Self {
        Self {
            table: table_ref!(table),
            alias: DEFAULT_ALIAS.to_string(),
            filter: None,
            executor,
        }
    }

    pub fn with_schema(mut self, schema: &str) -> Self {
        self.table.schema = Some(schema.to_string());
        self
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = alias.to_string();
        self
    }

    /// Narrows the relation; repeated calls are AND-ed together.
    pub fn with_filter(mut self, condition: Expr) -> Self {
        self.filter = combine(self.filter.take(), Some(condition));
        self
    }

    pub fn table(&self) -> &TableRef {
        &self.table
    }
}

fn combine(left: Option<Expr>, right: Option<Expr>) -> Option<Expr> {
    match (left, right) {
        (Some(l), Some(r)) => Some(l.and(r)),
        (l, r) => l.or(r),
    }
}

impl Relation for TableRelation {
    fn current_alias(&self) -> &str {
        &self.alias
    }

    fn search(&self, filter: Option<Expr>, descriptor: QueryDescriptor) -> ResultSet {
        let query = StatsQuery {
            table: self.table.clone(),
            alias: self.alias.clone(),
            filter: combine(self.filter.clone(), filter),
            descriptor,
        };
        ResultSet::new(self.executor.clone(), query)
    }
}
