//! Rendering of query ASTs into SQL text plus bind parameters.

use model::core::value::Value;

use crate::query::{ast::common::TableRef, dialect::Dialect};

pub mod expr;
pub mod select;

/// A trait for any AST node that can be rendered into a SQL string.
pub trait Render {
    fn render(&self, renderer: &mut Renderer);
}

/// Accumulates SQL text and bind parameters for one statement.
pub struct Renderer<'a> {
    pub sql: String,
    pub params: Vec<Value>,
    pub dialect: &'a dyn Dialect,
}

impl<'a> Renderer<'a> {
    pub fn new(dialect: &'a dyn Dialect) -> Self {
        Self {
            sql: String::new(),
            params: Vec::new(),
            dialect,
        }
    }

    /// Consumes the renderer and returns the final SQL string and parameters.
    pub fn finish(self) -> (String, Vec<Value>) {
        (self.sql, self.params)
    }

    pub fn add_param(&mut self, value: Value) {
        self.params.push(value);
        let placeholder = self.dialect.get_placeholder(self.params.len() - 1);
        self.sql.push_str(&placeholder);
    }

    /// Pushes a dotted path with every part quoted, e.g. `"me"."cost"`.
    pub fn push_quoted(&mut self, parts: &[&str]) {
        for (i, part) in parts.iter().enumerate() {
            if i > 0 {
                self.sql.push('.');
            }
            let quoted = self.dialect.quote_identifier(part);
            self.sql.push_str(&quoted);
        }
    }

    pub fn render_table_ref(&mut self, table: &TableRef) {
        match &table.schema {
            Some(schema) => self.push_quoted(&[schema.as_str(), table.name.as_str()]),
            None => self.push_quoted(&[table.name.as_str()]),
        }
    }

    /// Renders a comma-separated list of nodes.
    pub fn render_list<T: Render>(&mut self, items: &[T]) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(", ");
            }
            item.render(self);
        }
    }
}
