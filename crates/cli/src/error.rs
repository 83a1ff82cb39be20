use connectors::sql::base::error::{ConnectorError, DbError};
use planner::stats::ArgumentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Invalid stats arguments: {0}")]
    Arguments(#[from] ArgumentError),

    #[error("Query failed: {0}")]
    Db(#[from] DbError),

    #[error("Failed to connect: {0}")]
    Connector(#[from] ConnectorError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize data to JSON: {0}")]
    JsonSerialize(#[from] serde_json::Error),

    #[error("Invalid dialect provided: {0}")]
    InvalidDialect(String),

    #[error("Configuration error: {0}")]
    Config(String),
}
