use crate::{conn::PostgresConnectionPinger, env::EnvManager, error::CliError};
use clap::Parser;
use commands::Commands;
use connectors::{
    relation::{SimpleStats, StatsQuery, TableRelation},
    sql::{
        base::{adapter::SqlAdapter, query::generator::QueryGenerator},
        postgres::adapter::PgAdapter,
    },
};
use planner::{
    query::{
        ast::common::TableRef,
        dialect::{Dialect, MySql, Postgres},
    },
    stats::{self, StatsArg, syntax::parse_args},
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod output;

#[derive(Parser)]
#[command(
    name = "simple-stats",
    version = "0.1.0",
    about = "Grouped aggregate queries from a list of columns"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Describe { alias, args } => {
            let descriptor = stats::build(&alias, read_args(&args)?)?;
            println!("{}", serde_json::to_string_pretty(&descriptor)?);
        }
        Commands::Sql {
            table,
            schema,
            alias,
            dialect,
            args,
        } => {
            let dialect = parse_dialect(&dialect)?;
            let query = StatsQuery {
                table: TableRef { schema, name: table },
                descriptor: stats::build(&alias, read_args(&args)?)?,
                alias,
                filter: None,
            };

            let (sql, params) = QueryGenerator::new(dialect).stats(&query)?;
            println!("{sql}");
            for (idx, param) in params.iter().enumerate() {
                println!("{} = {param}", dialect.get_placeholder(idx));
            }
        }
        Commands::Run {
            table,
            schema,
            alias,
            conn_str,
            env_file,
            json,
            args,
        } => {
            let conn_str = EnvManager::load(env_file.as_deref())?.conn_str(conn_str)?;
            let adapter = PgAdapter::connect(&conn_str).await?;

            let mut relation = TableRelation::new(&table, Arc::new(adapter)).with_alias(&alias);
            if let Some(schema) = schema {
                relation = relation.with_schema(&schema);
            }

            let result_set = relation.simple_stats(read_args(&args)?)?;
            let rows = result_set.all().await?;
            info!(table = %table, rows = rows.len(), "Stats query finished");

            output::print_rows(result_set.columns(), &rows, json)?;
        }
        Commands::TestConn { conn_str, env_file } => {
            let conn_str = EnvManager::load(env_file.as_deref())?.conn_str(conn_str)?;
            PostgresConnectionPinger { conn_str }.ping().await?;
        }
    }

    Ok(())
}

fn read_args(args: &[String]) -> Result<Vec<StatsArg>, CliError> {
    Ok(parse_args(args)?)
}

fn parse_dialect(name: &str) -> Result<&'static dyn Dialect, CliError> {
    match name.to_lowercase().as_str() {
        "pg" | "postgres" | "postgresql" => Ok(&Postgres),
        "mysql" | "mariadb" => Ok(&MySql),
        other => Err(CliError::InvalidDialect(other.to_string())),
    }
}
