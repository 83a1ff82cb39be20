use crate::error::CliError;
use model::{core::value::Value, records::row::RowData};
use serde_json::{Map, Number, Value as JsonValue};

/// A cell as shown in the table output; strings are printed unquoted.
fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Date(d) => d.to_string(),
        Value::Timestamp(t) => t.to_rfc3339(),
        Value::TimestampNaive(t) => t.to_string(),
        Value::Json(j) => j.to_string(),
        other => other.to_string(),
    }
}

fn to_json(value: &Value) -> JsonValue {
    match value {
        Value::Int(i) => JsonValue::from(*i),
        Value::Float(f) => Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or(JsonValue::Null),
        Value::Boolean(b) => JsonValue::Bool(*b),
        Value::Json(j) => j.clone(),
        Value::Null => JsonValue::Null,
        Value::Decimal(d) => JsonValue::String(d.to_string()),
        other => JsonValue::String(cell(other)),
    }
}

pub fn render_table(columns: &[String], rows: &[RowData]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| cell(&row.get_value(c))).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|r| r[i].chars().count())
                .chain(std::iter::once(c.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let line = |values: &[String]| {
        values
            .iter()
            .zip(&widths)
            .map(|(v, &w)| format!("{v:<w$}"))
            .collect::<Vec<_>>()
            .join(" | ")
            .trim_end()
            .to_string()
    };

    let mut out = vec![line(columns)];
    out.push(
        widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("-+-"),
    );
    out.extend(cells.iter().map(|r| line(r)));
    out.join("\n")
}

pub fn render_json(columns: &[String], rows: &[RowData]) -> Result<String, CliError> {
    let rows: Vec<JsonValue> = rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = columns
                .iter()
                .map(|c| (c.clone(), to_json(&row.get_value(c))))
                .collect();
            JsonValue::Object(object)
        })
        .collect();
    Ok(serde_json::to_string_pretty(&rows)?)
}

pub fn print_rows(columns: &[String], rows: &[RowData], as_json: bool) -> Result<(), CliError> {
    if as_json {
        println!("{}", render_json(columns, rows)?);
    } else {
        println!("{}", render_table(columns, rows));
        println!("({} rows)", rows.len());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> (Vec<String>, Vec<RowData>) {
        let columns = vec!["name".to_string(), "name_count".to_string()];
        let rows = vec![
            RowData::from_pairs(
                "purchases",
                [("name", Value::String("apple".into())), ("name_count", Value::Int(2))],
            ),
            RowData::from_pairs(
                "purchases",
                [("name", Value::Null), ("name_count", Value::Int(10))],
            ),
        ];
        (columns, rows)
    }

    #[test]
    fn test_render_table() {
        let (columns, rows) = rows();
        assert_eq!(
            render_table(&columns, &rows),
            "name  | name_count\n------+-----------\napple | 2\nNULL  | 10"
        );
    }

    #[test]
    fn test_render_json() {
        let (columns, rows) = rows();
        let parsed: JsonValue = serde_json::from_str(&render_json(&columns, &rows).unwrap()).unwrap();
        assert_eq!(
            parsed,
            serde_json::json!([
                {"name": "apple", "name_count": 2},
                {"name": null, "name_count": 10}
            ])
        );
    }
}
