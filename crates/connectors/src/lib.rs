pub mod memory;
pub mod relation;
pub mod result_set;
pub mod sql;

pub use relation::{Relation, SimpleStats, StatsExecutor, StatsQuery, TableRelation};
pub use result_set::ResultSet;
