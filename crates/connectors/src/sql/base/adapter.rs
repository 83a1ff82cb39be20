use crate::{
    relation::{StatsExecutor, StatsQuery},
    sql::base::{
        error::{ConnectorError, DbError},
        query::generator::QueryGenerator,
    },
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::query::dialect::Dialect;
use tracing::debug;

#[async_trait]
pub trait SqlAdapter: Send + Sync {
    async fn connect(url: &str) -> Result<Self, ConnectorError>
    where
        Self: Sized;

    /// Runs `sql` with positional bind parameters and returns every row,
    /// tagged with `entity`.
    async fn query_rows(
        &self,
        entity: &str,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<RowData>, DbError>;

    /// Round-trips a trivial query to check the connection is alive.
    async fn ping(&self) -> Result<(), DbError>;

    fn dialect(&self) -> &dyn Dialect;
}

#[async_trait]
impl<T: SqlAdapter> StatsExecutor for T {
    async fn execute(&self, query: &StatsQuery) -> Result<Vec<RowData>, DbError> {
        let (sql, params) = QueryGenerator::new(self.dialect()).stats(query)?;
        debug!(dialect = %self.dialect().name(), %sql, params = params.len(), "Executing stats query");
        self.query_rows(&query.table.name, &sql, params).await
    }
}
