use crate::sql::postgres::numeric::PgNumeric;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use model::{
    core::value::{FieldValue, Value},
    records::row::RowData,
};
use tokio_postgres::{
    Row as PgRow,
    types::{FromSqlOwned, Type},
};
use tracing::warn;

/// Converts a Postgres result row into `RowData`, keyed by column name.
pub fn to_row_data(row: &PgRow, entity: &str) -> RowData {
    let field_values = row
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| FieldValue {
            name: column.name().to_string(),
            value: decode(row, idx, column.type_()),
        })
        .collect();

    RowData::new(entity, field_values)
}

fn get<T: FromSqlOwned>(row: &PgRow, idx: usize) -> Option<T> {
    match row.try_get::<_, Option<T>>(idx) {
        Ok(value) => value,
        Err(err) => {
            let column = row.columns()[idx].name();
            warn!(column, %err, "Failed to decode column, returning NULL");
            None
        }
    }
}

fn decode(row: &PgRow, idx: usize, ty: &Type) -> Option<Value> {
    match ty.name() {
        "int2" => get::<i16>(row, idx).map(|v| Value::Int(v.into())),
        "int4" => get::<i32>(row, idx).map(|v| Value::Int(v.into())),
        "int8" => get::<i64>(row, idx).map(Value::Int),
        "float4" => get::<f32>(row, idx).map(|v| Value::Float(v.into())),
        "float8" => get::<f64>(row, idx).map(Value::Float),
        "numeric" => get::<PgNumeric>(row, idx).map(|n| match n {
            PgNumeric::Finite(d) => Value::Decimal(d),
            PgNumeric::Special(f) => Value::Float(f),
        }),
        "text" | "varchar" | "bpchar" | "name" | "citext" => {
            get::<String>(row, idx).map(Value::String)
        }
        "bool" => get::<bool>(row, idx).map(Value::Boolean),
        "json" | "jsonb" => get::<serde_json::Value>(row, idx).map(Value::Json),
        "bytea" => get::<Vec<u8>>(row, idx).map(Value::Bytes),
        "date" => get::<NaiveDate>(row, idx).map(Value::Date),
        "timestamp" => get::<NaiveDateTime>(row, idx).map(Value::TimestampNaive),
        "timestamptz" => get::<DateTime<Utc>>(row, idx).map(Value::Timestamp),
        // Anything else is read as text when the driver allows it.
        _ => get::<String>(row, idx).map(Value::String),
    }
}
