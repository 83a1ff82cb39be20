//! An in-process executor that evaluates stats queries over `RowData`.

pub mod eval;
pub mod table;

pub use table::MemoryTable;
