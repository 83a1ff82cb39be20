use crate::query::{
    ast::select::{FromClause, Select},
    renderer::{Render, Renderer},
};

impl Render for Select {
    fn render(&self, r: &mut Renderer) {
        // 1. SELECT clause
        r.sql.push_str("SELECT ");
        r.render_list(&self.columns);

        // 2. FROM
        if let Some(from) = &self.from {
            r.sql.push(' ');
            from.render(r);
        }

        // 3. WHERE
        if let Some(where_clause) = &self.where_clause {
            r.sql.push_str(" WHERE ");
            where_clause.render(r);
        }

        // 4. GROUP BY
        if !self.group_by.is_empty() {
            r.sql.push_str(" GROUP BY ");
            r.render_list(&self.group_by);
        }

        // 5. ORDER BY
        if !self.order_by.is_empty() {
            r.sql.push_str(" ORDER BY ");
            r.render_list(&self.order_by);
        }
    }
}

impl Render for FromClause {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str("FROM ");
        r.render_table_ref(&self.table);
        if let Some(alias) = &self.alias {
            r.sql.push_str(" AS ");
            r.push_quoted(&[alias.as_str()]);
        }
    }
}

#[cfg(test)]
mod tests {
    use model::core::value::Value;

    use crate::{
        aliased,
        query::{
            ast::{
                common::TableRef,
                expr::{BinaryOp, BinaryOperator, Expr, FunctionCall},
                select::{FromClause, Select},
            },
            dialect::{MySql, Postgres},
            ident, qualified_ident,
            renderer::{Render, Renderer},
            value,
        },
    };

    fn users() -> Option<FromClause> {
        Some(FromClause {
            table: TableRef {
                schema: None,
                name: "users".to_string(),
            },
            alias: None,
        })
    }

    #[test]
    fn test_simple_select_postgres() {
        let ast = Select {
            columns: vec![ident("id"), ident("name")],
            from: users(),
            where_clause: Some(Expr::BinaryOp(Box::new(BinaryOp {
                left: ident("id"),
                op: BinaryOperator::Eq,
                right: value(Value::Int(123)),
            }))),
            ..Default::default()
        };

        let dialect = Postgres;
        let mut renderer = Renderer::new(&dialect);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        assert_eq!(sql, r#"SELECT "id", "name" FROM "users" WHERE ("id" = $1)"#);
        assert_eq!(params, vec![Value::Int(123)]);
    }

    #[test]
    fn test_simple_select_mysql() {
        let ast = Select {
            columns: vec![ident("id"), ident("name")],
            from: users(),
            where_clause: Some(Expr::BinaryOp(Box::new(BinaryOp {
                left: ident("id"),
                op: BinaryOperator::Eq,
                right: value(Value::String("abc".to_string())),
            }))),
            ..Default::default()
        };

        let dialect = MySql;
        let mut renderer = Renderer::new(&dialect);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        assert_eq!(sql, "SELECT `id`, `name` FROM `users` WHERE (`id` = ?)");
        assert_eq!(params, vec![Value::String("abc".to_string())]);
    }

    #[test]
    fn test_grouped_select_postgres() {
        let ast = Select {
            columns: vec![
                aliased!(qualified_ident("p", "user_id"), "user_id"),
                aliased!(
                    Expr::FunctionCall(FunctionCall {
                        name: "COUNT".to_string(),
                        args: vec![qualified_ident("p", "id")],
                    }),
                    "post_count"
                ),
            ],
            from: Some(FromClause {
                table: TableRef {
                    schema: Some("blog".to_string()),
                    name: "posts".to_string(),
                },
                alias: Some("p".to_string()),
            }),
            where_clause: Some(Expr::BinaryOp(Box::new(BinaryOp {
                left: qualified_ident("p", "status"),
                op: BinaryOperator::NotEq,
                right: value(Value::String("draft".to_string())),
            }))),
            group_by: vec![qualified_ident("p", "user_id")],
            order_by: vec![qualified_ident("p", "user_id")],
        };

        let dialect = Postgres;
        let mut renderer = Renderer::new(&dialect);
        ast.render(&mut renderer);
        let (sql, params) = renderer.finish();

        let expected_sql = r#"SELECT "p"."user_id" AS "user_id", COUNT("p"."id") AS "post_count" FROM "blog"."posts" AS "p" WHERE ("p"."status" <> $1) GROUP BY "p"."user_id" ORDER BY "p"."user_id""#;
        assert_eq!(sql, expected_sql);
        assert_eq!(params, vec![Value::String("draft".to_string())]);
    }
}
