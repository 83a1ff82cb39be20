//! The query descriptor handed to a relation's search operation.

use crate::stats::column::ColumnRef;
use serde::Serialize;

/// One aggregate term, e.g. `COUNT(me.cost) AS num_purchases`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateSpec {
    pub function: String,
    pub column: ColumnRef,
    pub alias: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SelectItem {
    Column(ColumnRef),
    Aggregate(AggregateSpec),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryDescriptor {
    pub group_by: Vec<ColumnRef>,
    pub select: Vec<SelectItem>,
    pub output_aliases: Vec<String>,
    pub order_by: Vec<ColumnRef>,
}

impl QueryDescriptor {
    pub fn aggregates(&self) -> impl Iterator<Item = &AggregateSpec> {
        self.select.iter().filter_map(|item| match item {
            SelectItem::Aggregate(spec) => Some(spec),
            SelectItem::Column(_) => None,
        })
    }

    /// Select items paired with the output alias they appear under.
    pub fn outputs(&self) -> impl Iterator<Item = (&SelectItem, &str)> {
        self.select
            .iter()
            .zip(self.output_aliases.iter().map(String::as_str))
    }
}
