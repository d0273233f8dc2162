mod csv;
mod types;
mod validator;

pub use csv::{normalize_column_name, CsvConnector};
pub use types::{
    TableSummary,
    ColumnStats,
};
pub use validator::DataValidator;
