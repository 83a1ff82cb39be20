use thiserror::Error;

/// Caller mistakes detected while normalizing stats arguments.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ArgumentError {
    #[error("No columns")]
    NoColumns,

    #[error("Unsupported reference type: {0}")]
    UnsupportedReference(String),

    /// An aggregate descriptor must name exactly one `function: column` pair.
    #[error("Aggregate descriptor must name exactly one function, got {} ({})", .0.len(), .0.join(", "))]
    AggregateArity(Vec<String>),

    #[error("Invalid stats argument '{input}': {message}")]
    Syntax { input: String, message: String },
}
