mod rows;
mod schema;
mod target;
mod writer;

pub use rows::{frame_rows, SqlValue};
pub use schema::{quote_identifier, ColumnPlan, SqlType, TablePlan};
pub use target::{DatabaseTarget, Dialect};
pub use writer::SqlSink;
