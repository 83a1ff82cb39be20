pub mod query;
pub mod stats;
