//! Parses stats arguments written on a command line.
//!
//! Plain text uses the compact form from `grammar.pest`
//! (`name`, `me.name`, `sum(cost)`, `sum(cost) as total_cost`); text that
//! looks like JSON is decoded and converted with the JSON rules of
//! [`StatsArg`].

use crate::stats::{
    arg::{AggregateArg, StatsArg},
    error::ArgumentError,
};
use pest::{Parser, iterators::Pair};
use pest_derive::Parser;

#[derive(Parser)]
#[grammar = "stats/grammar.pest"]
struct StatsArgParser;

fn syntax_error(input: &str, message: impl Into<String>) -> ArgumentError {
    ArgumentError::Syntax {
        input: input.to_string(),
        message: message.into(),
    }
}

fn looks_like_json(input: &str) -> bool {
    input
        .chars()
        .next()
        .is_some_and(|c| matches!(c, '{' | '[' | '"' | '-') || c.is_ascii_digit())
}

pub fn parse_arg(input: &str) -> Result<StatsArg, ArgumentError> {
    let trimmed = input.trim();

    if looks_like_json(trimmed) {
        let value: serde_json::Value =
            serde_json::from_str(trimmed).map_err(|e| syntax_error(input, e.to_string()))?;
        return StatsArg::try_from(value);
    }

    let argument = StatsArgParser::parse(Rule::argument, trimmed)
        .map_err(|e| syntax_error(input, e.variant.message()))?
        .next()
        .ok_or_else(|| syntax_error(input, "empty argument"))?;

    let inner = argument
        .into_inner()
        .next()
        .ok_or_else(|| syntax_error(input, "empty argument"))?;

    match inner.as_rule() {
        Rule::column => Ok(StatsArg::column(inner.as_str())),
        Rule::aggregate => Ok(StatsArg::Aggregate(aggregate(inner))),
        other => Err(syntax_error(input, format!("unexpected {other:?}"))),
    }
}

pub fn parse_args<I, S>(inputs: I) -> Result<Vec<StatsArg>, ArgumentError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|input| parse_arg(input.as_ref()))
        .collect()
}

fn aggregate(pair: Pair<Rule>) -> AggregateArg {
    let mut arg = AggregateArg::default();
    let mut function = String::new();

    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::function => function = part.as_str().to_string(),
            Rule::column => arg.pairs.push((function.clone(), part.as_str().to_string())),
            Rule::alias => arg.alias = Some(part.as_str().to_string()),
            _ => {}
        }
    }

    arg
}
