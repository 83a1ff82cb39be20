use crate::{
    memory::eval,
    relation::{StatsExecutor, StatsQuery, TableRelation},
    sql::base::error::DbError,
};
use async_trait::async_trait;
use model::{core::value::Value, records::row::RowData};
use planner::stats::SelectItem;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::debug;

/// A named table of rows held in memory.
pub struct MemoryTable {
    name: String,
    rows: RwLock<Vec<RowData>>,
}

impl MemoryTable {
    pub fn new(name: &str, rows: Vec<RowData>) -> Self {
        Self {
            name: name.to_string(),
            rows: RwLock::new(rows),
        }
    }

    pub async fn insert(&self, row: RowData) {
        self.rows.write().await.push(row);
    }

    /// A relation over this table, aliased `me`.
    pub fn relation(self: &Arc<Self>) -> TableRelation {
        TableRelation::new(&self.name, self.clone())
    }
}

struct Group<'a> {
    key: Vec<Value>,
    rows: Vec<&'a RowData>,
}

#[async_trait]
impl StatsExecutor for MemoryTable {
    async fn execute(&self, query: &StatsQuery) -> Result<Vec<RowData>, DbError> {
        if query.table.name != self.name {
            return Err(DbError::QueryBuildError(format!(
                "Table '{}' is not available in memory table '{}'",
                query.table.name, self.name
            )));
        }

        let rows = self.rows.read().await;
        let descriptor = &query.descriptor;
        let alias = query.alias.as_str();

        // Groups in order of first appearance, then sorted below.
        let mut groups: Vec<Group> = Vec::new();
        let mut index: HashMap<Vec<Value>, usize> = HashMap::new();

        for row in rows.iter() {
            if let Some(filter) = &query.filter {
                if !eval::matches(filter, row, alias)? {
                    continue;
                }
            }

            let key = descriptor
                .group_by
                .iter()
                .map(|col| eval::column(row, col, alias))
                .collect::<Result<Vec<_>, _>>()?;

            let slot = *index.entry(key.clone()).or_insert_with(|| {
                groups.push(Group { key, rows: Vec::new() });
                groups.len() - 1
            });
            groups[slot].rows.push(row);
        }

        let sort_positions = descriptor
            .order_by
            .iter()
            .map(|col| {
                descriptor
                    .group_by
                    .iter()
                    .position(|g| g == col)
                    .ok_or_else(|| {
                        DbError::QueryBuildError(format!("Cannot order by non-grouped column {col}"))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        groups.sort_by(|a, b| {
            sort_positions
                .iter()
                .map(|&pos| a.key[pos].sort_cmp(&b.key[pos]))
                .find(|ord| ord.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let mut output = Vec::with_capacity(groups.len());
        for group in &groups {
            let mut fields = Vec::with_capacity(descriptor.select.len());
            for (item, alias_name) in descriptor.outputs() {
                let value = match item {
                    SelectItem::Column(col) => descriptor
                        .group_by
                        .iter()
                        .position(|g| g == col)
                        .map(|pos| group.key[pos].clone())
                        .unwrap_or(Value::Null),
                    SelectItem::Aggregate(spec) => {
                        let values = group
                            .rows
                            .iter()
                            .map(|row| eval::column(row, &spec.column, alias))
                            .collect::<Result<Vec<_>, _>>()?;
                        eval::aggregate(&spec.function, &values)?
                    }
                };
                fields.push((alias_name, value));
            }
            output.push(RowData::from_pairs(&self.name, fields));
        }

        debug!(
            table = %self.name,
            scanned = rows.len(),
            groups = output.len(),
            "Evaluated stats query in memory"
        );

        Ok(output)
    }
}
