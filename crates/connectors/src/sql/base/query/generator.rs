use crate::{relation::StatsQuery, sql::base::error::DbError};
use model::core::value::Value;
use planner::{
    aliased,
    query::{
        ast::expr::{Expr, FunctionCall},
        builder::select::SelectBuilder,
        dialect::Dialect,
        qualified_ident,
        renderer::{Render, Renderer},
    },
    stats::{AggregateSpec, ColumnRef, SelectItem},
};
use tracing::debug;

pub struct QueryGenerator<'a> {
    dialect: &'a dyn Dialect,
}

impl<'a> QueryGenerator<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self { dialect }
    }

    /// Generates the grouped SELECT for a stats query and its parameters.
    pub fn stats(&self, query: &StatsQuery) -> Result<(String, Vec<Value>), DbError> {
        let descriptor = &query.descriptor;

        let columns = descriptor
            .outputs()
            .map(|(item, alias)| select_expr(item, alias))
            .collect::<Result<Vec<_>, _>>()?;

        let mut select = SelectBuilder::new()
            .select(columns)
            .from(query.table.clone(), Some(query.alias.as_str()));

        if let Some(filter) = &query.filter {
            select = select.where_clause(filter.clone());
        }

        let select = select
            .group_by(descriptor.group_by.iter().map(column_expr).collect())
            .order_by(descriptor.order_by.iter().map(column_expr).collect());

        let (sql, params) = self.render_ast(select.build());
        debug!(dialect = %self.dialect.name(), %sql, "Generated stats query");
        Ok((sql, params))
    }

    fn render_ast(&self, ast: impl Render) -> (String, Vec<Value>) {
        let mut renderer = Renderer::new(self.dialect);
        ast.render(&mut renderer);
        renderer.finish()
    }
}

fn column_expr(column: &ColumnRef) -> Expr {
    qualified_ident(&column.qualifier, &column.name)
}

fn select_expr(item: &SelectItem, alias: &str) -> Result<Expr, DbError> {
    match item {
        SelectItem::Column(column) => Ok(aliased!(column_expr(column), alias)),
        SelectItem::Aggregate(spec) => Ok(aliased!(aggregate_expr(spec)?, alias)),
    }
}

/// Function names are emitted verbatim, so only plain identifiers pass.
fn is_function_name(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn aggregate_expr(spec: &AggregateSpec) -> Result<Expr, DbError> {
    if !is_function_name(&spec.function) {
        return Err(DbError::QueryBuildError(format!(
            "Invalid aggregate function name: '{}'",
            spec.function
        )));
    }

    Ok(Expr::FunctionCall(FunctionCall {
        name: spec.function.to_uppercase(),
        args: vec![column_expr(&spec.column)],
    }))
}
