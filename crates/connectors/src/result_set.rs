use crate::{
    relation::{StatsExecutor, StatsQuery},
    sql::base::error::DbError,
};
use futures_util::{
    StreamExt,
    stream::{self, BoxStream},
};
use model::records::row::RowData;
use std::{fmt, sync::Arc};
use tracing::debug;

/// A prepared stats query. Every consumption runs the query again, so a
/// result set can be iterated any number of times.
#[derive(Clone)]
pub struct ResultSet {
    executor: Arc<dyn StatsExecutor>,
    query: Arc<StatsQuery>,
}

impl ResultSet {
    pub fn new(executor: Arc<dyn StatsExecutor>, query: StatsQuery) -> Self {
        Self {
            executor,
            query: Arc::new(query),
        }
    }

    pub fn query(&self) -> &StatsQuery {
        &self.query
    }

    /// Field names every returned row carries, in select order.
    pub fn columns(&self) -> &[String] {
        &self.query.descriptor.output_aliases
    }

    pub async fn all(&self) -> Result<Vec<RowData>, DbError> {
        debug!(table = %self.query.table.name, alias = %self.query.alias, "Running stats query");
        self.executor.execute(&self.query).await
    }

    pub async fn first(&self) -> Result<Option<RowData>, DbError> {
        Ok(self.all().await?.into_iter().next())
    }

    /// Streams the rows. The query runs when the stream is first polled.
    pub fn rows(&self) -> BoxStream<'_, Result<RowData, DbError>> {
        stream::once(self.all())
            .flat_map(|result| match result {
                Ok(rows) => stream::iter(rows.into_iter().map(Ok)).left_stream(),
                Err(err) => stream::iter(std::iter::once(Err(err))).right_stream(),
            })
            .boxed()
    }
}

impl fmt::Debug for ResultSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResultSet")
            .field("query", &self.query)
            .finish_non_exhaustive()
    }
}
