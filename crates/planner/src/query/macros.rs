#[macro_export]
macro_rules! table_ref {
    ($name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: None,
            name: $name.to_string(),
        }
    };
    ($schema:expr, $name:expr) => {
        $crate::query::ast::common::TableRef {
            schema: Some($schema.to_string()),
            name: $name.to_string(),
        }
    };
}

/// Creates an aliased expression: `aliased!(expr, "total")`.
#[macro_export]
macro_rules! aliased {
    ($expr:expr, $alias:expr) => {
        $crate::query::ast::expr::Expr::Alias {
            expr: Box::new($expr),
            alias: $alias.to_string(),
        }
    };
}
