use crate::query::{
    ast::expr::{BinaryOp, Expr, FunctionCall, Ident},
    renderer::{Render, Renderer},
};

impl Render for Expr {
    fn render(&self, r: &mut Renderer) {
        match self {
            Expr::Identifier(ident) => ident.render(r),
            Expr::Value(val) => r.add_param(val.clone()),
            Expr::BinaryOp(op) => op.render(r),
            Expr::FunctionCall(call) => call.render(r),
            Expr::Alias { expr, alias } => {
                expr.render(r);
                r.sql.push_str(" AS ");
                r.push_quoted(&[alias.as_str()]);
            }
        }
    }
}

impl Render for Ident {
    fn render(&self, r: &mut Renderer) {
        match &self.qualifier {
            Some(qualifier) => r.push_quoted(&[qualifier.as_str(), self.name.as_str()]),
            None => r.push_quoted(&[self.name.as_str()]),
        }
    }
}

/// Every operation is parenthesized, so nested AND/OR keep their grouping.
impl Render for BinaryOp {
    fn render(&self, r: &mut Renderer) {
        r.sql.push('(');
        self.left.render(r);
        r.sql.push(' ');
        r.sql.push_str(self.op.symbol());
        r.sql.push(' ');
        self.right.render(r);
        r.sql.push(')');
    }
}

impl Render for FunctionCall {
    fn render(&self, r: &mut Renderer) {
        r.sql.push_str(&self.name);
        r.sql.push('(');
        r.render_list(&self.args);
        r.sql.push(')');
    }
}
