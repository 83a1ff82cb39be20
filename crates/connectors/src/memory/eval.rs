//! Filter and aggregate evaluation over in-memory rows.

use crate::sql::base::error::DbError;
use bigdecimal::BigDecimal;
use model::{core::value::Value, records::row::RowData};
use planner::{
    query::ast::expr::{BinaryOperator, Expr, Ident},
    stats::ColumnRef,
};
use std::cmp::Ordering;

fn unsupported(msg: impl Into<String>) -> DbError {
    DbError::QueryBuildError(msg.into())
}

/// Resolves an identifier against a row of the relation aliased `alias`.
fn field(row: &RowData, ident: &Ident, alias: &str) -> Result<Value, DbError> {
    match &ident.qualifier {
        Some(q) if q != alias => Err(unsupported(format!(
            "Unknown relation alias '{q}' (only '{alias}' is available)"
        ))),
        _ => Ok(row.get_value(&ident.name)),
    }
}

pub fn column(row: &RowData, column: &ColumnRef, alias: &str) -> Result<Value, DbError> {
    if column.qualifier != alias {
        return Err(unsupported(format!(
            "Unknown relation alias '{}' (only '{alias}' is available)",
            column.qualifier
        )));
    }
    Ok(row.get_value(&column.name))
}

fn operand(expr: &Expr, row: &RowData, alias: &str) -> Result<Value, DbError> {
    match expr {
        Expr::Identifier(ident) => field(row, ident, alias),
        Expr::Value(v) => Ok(v.clone()),
        Expr::Alias { expr, .. } => operand(expr, row, alias),
        other => Err(unsupported(format!("Unsupported filter operand: {other:?}"))),
    }
}

/// Evaluates a filter condition. Comparisons involving NULL or values of
/// incomparable types are false.
pub fn matches(filter: &Expr, row: &RowData, alias: &str) -> Result<bool, DbError> {
    let Expr::BinaryOp(op) = filter else {
        return Err(unsupported(format!("Unsupported filter: {filter:?}")));
    };

    match op.op {
        BinaryOperator::And => {
            Ok(matches(&op.left, row, alias)? && matches(&op.right, row, alias)?)
        }
        BinaryOperator::Or => Ok(matches(&op.left, row, alias)? || matches(&op.right, row, alias)?),
        ref cmp => {
            let left = operand(&op.left, row, alias)?;
            let right = operand(&op.right, row, alias)?;
            Ok(left
                .compare(&right)
                .is_some_and(|ord| satisfies(cmp, ord)))
        }
    }
}

fn satisfies(op: &BinaryOperator, ord: Ordering) -> bool {
    match op {
        BinaryOperator::Eq => ord == Ordering::Equal,
        BinaryOperator::NotEq => ord != Ordering::Equal,
        BinaryOperator::Lt => ord == Ordering::Less,
        BinaryOperator::LtEq => ord != Ordering::Greater,
        BinaryOperator::Gt => ord == Ordering::Greater,
        BinaryOperator::GtEq => ord != Ordering::Less,
        BinaryOperator::And | BinaryOperator::Or => false,
    }
}

/// Applies an aggregate function to the values of one group. NULLs are
/// skipped; an all-NULL group yields NULL (or 0 for `count`).
pub fn aggregate(function: &str, values: &[Value]) -> Result<Value, DbError> {
    let present: Vec<&Value> = values.iter().filter(|v| !v.is_null()).collect();

    match function.to_lowercase().as_str() {
        "count" => Ok(Value::Int(present.len() as i64)),
        "sum" => sum(&present),
        "avg" => {
            if present.is_empty() {
                return Ok(Value::Null);
            }
            let total = numbers(&present)?.iter().sum::<f64>();
            Ok(Value::Float(total / present.len() as f64))
        }
        "min" => extreme(&present, Ordering::Less),
        "max" => extreme(&present, Ordering::Greater),
        other => Err(unsupported(format!("Unsupported aggregate function: {other}"))),
    }
}

fn numbers(values: &[&Value]) -> Result<Vec<f64>, DbError> {
    values
        .iter()
        .map(|v| {
            v.as_f64()
                .ok_or_else(|| unsupported(format!("Cannot aggregate non-numeric value {v}")))
        })
        .collect()
}

fn sum(values: &[&Value]) -> Result<Value, DbError> {
    if values.is_empty() {
        return Ok(Value::Null);
    }

    if values.iter().all(|v| matches!(v, Value::Int(_))) {
        let total = values
            .iter()
            .try_fold(0i64, |acc, v| acc.checked_add(v.as_i64().unwrap_or(0)));
        if let Some(total) = total {
            return Ok(Value::Int(total));
        }
    }

    if values.iter().any(|v| matches!(v, Value::Float(_))) {
        return Ok(Value::Float(numbers(values)?.iter().sum()));
    }

    values
        .iter()
        .try_fold(BigDecimal::from(0), |acc, v| {
            v.as_big_decimal()
                .map(|d| acc + d)
                .ok_or_else(|| unsupported(format!("Cannot aggregate non-numeric value {v}")))
        })
        .map(Value::Decimal)
}

fn extreme(values: &[&Value], wanted: Ordering) -> Result<Value, DbError> {
    let mut best: Option<&Value> = None;
    for &v in values {
        best = match best {
            None => Some(v),
            Some(current) => match v.compare(current) {
                Some(ord) if ord == wanted => Some(v),
                Some(_) => Some(current),
                None => {
                    return Err(unsupported(format!("Cannot compare {v} with {current}")));
                }
            },
        };
    }
    Ok(best.cloned().unwrap_or(Value::Null))
}

#[cfg(test)]
mod tests {
    use super::*;
    use planner::query::{ast::expr::BinaryOp, qualified_ident, value};

    fn row() -> RowData {
        RowData::from_pairs(
            "purchases",
            [
                ("name", Value::String("a".into())),
                ("cost", Value::Int(5)),
                ("note", Value::Null),
            ],
        )
    }

    fn cmp(column: &str, op: BinaryOperator, v: Value) -> Expr {
        Expr::BinaryOp(Box::new(BinaryOp {
            left: qualified_ident("me", column),
            op,
            right: value(v),
        }))
    }

    #[test]
    fn test_matches_comparisons() {
        let row = row();
        assert!(matches(&cmp("cost", BinaryOperator::Gt, Value::Int(4)), &row, "me").unwrap());
        assert!(!matches(&cmp("cost", BinaryOperator::Lt, Value::Int(4)), &row, "me").unwrap());
        assert!(
            !matches(&cmp("note", BinaryOperator::Eq, Value::Null), &row, "me").unwrap(),
            "NULL never compares equal"
        );

        let both = cmp("cost", BinaryOperator::GtEq, Value::Int(5))
            .and(cmp("name", BinaryOperator::Eq, Value::String("a".into())));
        assert!(matches(&both, &row, "me").unwrap());
    }

    #[test]
    fn test_matches_rejects_foreign_alias() {
        let filter = Expr::BinaryOp(Box::new(BinaryOp {
            left: qualified_ident("other", "cost"),
            op: BinaryOperator::Eq,
            right: value(Value::Int(1)),
        }));
        assert!(matches(&filter, &row(), "me").is_err());
    }

    #[test]
    fn test_aggregates() {
        let values = vec![Value::Int(3), Value::Null, Value::Int(9), Value::Int(6)];
        assert_eq!(aggregate("count", &values).unwrap(), Value::Int(3));
        assert_eq!(aggregate("SUM", &values).unwrap(), Value::Int(18));
        assert_eq!(aggregate("min", &values).unwrap(), Value::Int(3));
        assert_eq!(aggregate("max", &values).unwrap(), Value::Int(9));
        assert_eq!(aggregate("avg", &values).unwrap(), Value::Float(6.0));
        assert!(aggregate("median", &values).is_err());
    }

    #[test]
    fn test_aggregates_of_nulls() {
        let values = vec![Value::Null, Value::Null];
        assert_eq!(aggregate("count", &values).unwrap(), Value::Int(0));
        assert_eq!(aggregate("sum", &values).unwrap(), Value::Null);
        assert_eq!(aggregate("max", &values).unwrap(), Value::Null);
    }

    #[test]
    fn test_sum_promotes_mixed_numbers() {
        let values = vec![Value::Int(1), Value::Float(0.5)];
        assert_eq!(aggregate("sum", &values).unwrap(), Value::Float(1.5));

        let values = vec![Value::Int(i64::MAX), Value::Int(1)];
        assert!(matches!(aggregate("sum", &values).unwrap(), Value::Decimal(_)));

        let values = vec![Value::String("x".into())];
        assert!(aggregate("sum", &values).is_err());
    }

    #[test]
    fn test_min_max_strings() {
        let values = vec![Value::String("b".into()), Value::String("a".into())];
        assert_eq!(aggregate("min", &values).unwrap(), Value::String("a".into()));
        assert_eq!(aggregate("max", &values).unwrap(), Value::String("b".into()));
    }
}
