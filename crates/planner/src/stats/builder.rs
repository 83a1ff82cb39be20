//! Turns a compact list of stats arguments into a grouped aggregate
//! query descriptor.

use crate::stats::{
    arg::{AggregateArg, StatsArg},
    column::{ColumnRef, qualify, unqualified},
    descriptor::{AggregateSpec, QueryDescriptor, SelectItem},
    error::ArgumentError,
};
use std::collections::HashSet;
use tracing::debug;

pub const DEFAULT_FUNCTION: &str = "count";

#[derive(Debug, Clone)]
pub struct StatsQueryBuilder<'a> {
    current_alias: &'a str,
}

impl<'a> StatsQueryBuilder<'a> {
    pub fn new(current_alias: &'a str) -> Self {
        Self { current_alias }
    }

    pub fn build<I>(&self, args: I) -> Result<QueryDescriptor, ArgumentError>
    where
        I: IntoIterator,
        I::Item: Into<StatsArg>,
    {
        let mut columns: Vec<ColumnRef> = Vec::new();
        let mut aggregates: Vec<AggregateSpec> = Vec::new();

        for arg in args {
            match arg.into() {
                StatsArg::Column(name) => columns.push(self.column(&name)?),
                StatsArg::Aggregate(agg) => {
                    let spec = self.aggregate(agg)?;
                    columns.push(spec.column.clone());
                    aggregates.push(spec);
                }
            }
        }

        let Some(first) = columns.first().cloned() else {
            return Err(ArgumentError::NoColumns);
        };

        if aggregates.is_empty() {
            aggregates.push(AggregateSpec {
                function: DEFAULT_FUNCTION.to_string(),
                alias: default_alias(&first.name, DEFAULT_FUNCTION),
                column: first,
            });
        }

        let mut seen = HashSet::new();
        columns.retain(|column| seen.insert(column.clone()));

        // Grouping columns appear under their own, unqualified names.
        let output_aliases = columns
            .iter()
            .map(|c| c.name.clone())
            .chain(aggregates.iter().map(|a| a.alias.clone()))
            .collect();
        let select = columns
            .iter()
            .cloned()
            .map(SelectItem::Column)
            .chain(aggregates.into_iter().map(SelectItem::Aggregate))
            .collect();

        let descriptor = QueryDescriptor {
            order_by: columns.clone(),
            group_by: columns,
            select,
            output_aliases,
        };

        debug!(
            alias = self.current_alias,
            group_by = ?descriptor.group_by.iter().map(ToString::to_string).collect::<Vec<_>>(),
            outputs = ?descriptor.output_aliases,
            "Built stats query descriptor"
        );

        Ok(descriptor)
    }

    fn column(&self, raw: &str) -> Result<ColumnRef, ArgumentError> {
        let column = qualify(self.current_alias, raw.trim());
        if column.name.is_empty() {
            return Err(ArgumentError::Syntax {
                input: raw.to_string(),
                message: "empty column name".to_string(),
            });
        }
        Ok(column)
    }

    fn aggregate(&self, arg: AggregateArg) -> Result<AggregateSpec, ArgumentError> {
        let AggregateArg { mut pairs, alias } = arg;
        if pairs.len() != 1 {
            return Err(ArgumentError::AggregateArity(
                pairs.into_iter().map(|(function, _)| function).collect(),
            ));
        }

        let (function, raw_column) = pairs.remove(0);
        let column = self.column(&raw_column)?;
        let alias = alias.unwrap_or_else(|| default_alias(&column.name, &function));
        Ok(AggregateSpec {
            column,
            function,
            alias,
        })
    }
}

/// `<column without qualifier>_<function>`
pub fn default_alias(column: &str, function: &str) -> String {
    format!("{}_{}", unqualified(column), function)
}

/// Shorthand for `StatsQueryBuilder::new(current_alias).build(args)`.
pub fn build<I>(current_alias: &str, args: I) -> Result<QueryDescriptor, ArgumentError>
where
    I: IntoIterator,
    I::Item: Into<StatsArg>,
{
    StatsQueryBuilder::new(current_alias).build(args)
}
