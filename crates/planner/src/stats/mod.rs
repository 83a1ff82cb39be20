//! The `simple_stats` argument normalization: grouping columns and aggregate
//! descriptors in, a grouped aggregate query descriptor out.

pub mod arg;
pub mod builder;
pub mod column;
pub mod descriptor;
pub mod error;
pub mod syntax;

pub use arg::{AggregateArg, StatsArg};
pub use builder::{StatsQueryBuilder, build};
pub use column::{ColumnRef, qualify, unqualified};
pub use descriptor::{AggregateSpec, QueryDescriptor, SelectItem};
pub use error::ArgumentError;
