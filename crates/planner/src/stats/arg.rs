//! Caller-facing stats arguments: a grouping column or an aggregate descriptor.

use crate::stats::error::ArgumentError;
use serde_json::Value as JsonValue;

/// Keys accepted as the alias of an aggregate descriptor.
pub const ALIAS_KEYS: [&str; 2] = ["alias", "-as"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsArg {
    /// A bare grouping column, optionally `alias.`-qualified.
    Column(String),

    /// An aggregate function over a column.
    Aggregate(AggregateArg),
}

impl StatsArg {
    pub fn column(name: impl Into<String>) -> Self {
        StatsArg::Column(name.into())
    }

    pub fn aggregate(function: impl Into<String>, column: impl Into<String>) -> Self {
        StatsArg::Aggregate(AggregateArg::new(function, column))
    }

    pub fn aggregate_as(
        function: impl Into<String>,
        column: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        StatsArg::Aggregate(AggregateArg::new(function, column).with_alias(alias))
    }
}

impl From<&str> for StatsArg {
    fn from(name: &str) -> Self {
        StatsArg::column(name)
    }
}

impl From<String> for StatsArg {
    fn from(name: String) -> Self {
        StatsArg::Column(name)
    }
}

impl From<AggregateArg> for StatsArg {
    fn from(arg: AggregateArg) -> Self {
        StatsArg::Aggregate(arg)
    }
}

/// `{function: column, alias?}`. The pairs are kept in the order they were
/// supplied; the builder accepts exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregateArg {
    pub pairs: Vec<(String, String)>,
    pub alias: Option<String>,
}

impl AggregateArg {
    pub fn new(function: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            pairs: vec![(function.into(), column.into())],
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_pair(mut self, function: impl Into<String>, column: impl Into<String>) -> Self {
        self.pairs.push((function.into(), column.into()));
        self
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "boolean",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn expect_str(value: JsonValue) -> Result<String, ArgumentError> {
    match value {
        JsonValue::String(s) => Ok(s),
        other => Err(ArgumentError::UnsupportedReference(
            json_type_name(&other).to_string(),
        )),
    }
}

impl TryFrom<JsonValue> for StatsArg {
    type Error = ArgumentError;

    fn try_from(value: JsonValue) -> Result<Self, Self::Error> {
        match value {
            JsonValue::String(name) => Ok(StatsArg::Column(name)),
            JsonValue::Object(map) => {
                let mut arg = AggregateArg::default();
                for (key, val) in map {
                    if ALIAS_KEYS.contains(&key.as_str()) {
                        arg.alias = Some(expect_str(val)?);
                    } else {
                        arg.pairs.push((key, expect_str(val)?));
                    }
                }
                Ok(StatsArg::Aggregate(arg))
            }
            other => Err(ArgumentError::UnsupportedReference(
                json_type_name(&other).to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_string_is_column() {
        let arg = StatsArg::try_from(json!("name")).unwrap();
        assert_eq!(arg, StatsArg::column("name"));
    }

    #[test]
    fn test_object_is_aggregate() {
        let arg = StatsArg::try_from(json!({"sum": "cost", "alias": "total_cost"})).unwrap();
        assert_eq!(arg, StatsArg::aggregate_as("sum", "cost", "total_cost"));

        let arg = StatsArg::try_from(json!({"count": "cost", "-as": "n"})).unwrap();
        assert_eq!(arg, StatsArg::aggregate_as("count", "cost", "n"));
    }

    #[test]
    fn test_object_keeps_every_pair() {
        let arg = StatsArg::try_from(json!({"min": "cost", "max": "cost"})).unwrap();
        match arg {
            StatsArg::Aggregate(agg) => assert_eq!(agg.pairs.len(), 2),
            other => panic!("expected aggregate, got {other:?}"),
        }
    }

    #[test]
    fn test_unsupported_shapes() {
        let err = StatsArg::try_from(json!([1, 2, 3])).unwrap_err();
        assert_eq!(err, ArgumentError::UnsupportedReference("array".into()));
        assert_eq!(err.to_string(), "Unsupported reference type: array");

        let err = StatsArg::try_from(json!(42)).unwrap_err();
        assert_eq!(err, ArgumentError::UnsupportedReference("number".into()));

        let err = StatsArg::try_from(json!({"sum": ["cost"]})).unwrap_err();
        assert_eq!(err, ArgumentError::UnsupportedReference("array".into()));
    }
}
