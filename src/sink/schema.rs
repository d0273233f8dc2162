use super::target::Dialect;
use crate::error::{LoaderError, Result};
use polars::prelude::*;

/// Column storage class used when creating the destination table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlType {
    Boolean,
    Integer,
    Double,
    Date,
    Text,
}

impl SqlType {
    pub fn for_dtype(dtype: &DataType) -> Self {
        match dtype {
            DataType::Boolean => Self::Boolean,
            DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64 => Self::Integer,
            DataType::Float32 | DataType::Float64 => Self::Double,
            DataType::Date => Self::Date,
            _ => Self::Text,
        }
    }

    pub fn type_name(&self, dialect: Dialect) -> &'static str {
        match (self, dialect) {
            (Self::Boolean, _) => "BOOLEAN",
            (Self::Integer, Dialect::Postgres) => "BIGINT",
            (Self::Integer, Dialect::Sqlite) => "INTEGER",
            (Self::Double, Dialect::Postgres) => "DOUBLE PRECISION",
            (Self::Double, Dialect::Sqlite) => "REAL",
            (Self::Date, _) => "DATE",
            (Self::Text, _) => "TEXT",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnPlan {
    pub name: String,
    pub sql_type: SqlType,
}

/// Destination layout derived from a frame's schema
#[derive(Debug, Clone)]
pub struct TablePlan {
    pub table: String,
    pub columns: Vec<ColumnPlan>,
}

impl TablePlan {
    pub fn from_frame(table: &str, df: &DataFrame) -> Result<Self> {
        if df.width() == 0 {
            return Err(LoaderError::DataLoading(format!(
                "Cannot create table '{}' without columns",
                table
            )));
        }

        let columns = df
            .get_columns()
            .iter()
            .map(|col| ColumnPlan {
                name: col.name().to_string(),
                sql_type: SqlType::for_dtype(col.dtype()),
            })
            .collect();

        Ok(Self {
            table: table.to_string(),
            columns,
        })
    }

    pub fn drop_sql(&self) -> String {
        format!("DROP TABLE IF EXISTS {}", quote_identifier(&self.table))
    }

    pub fn create_sql(&self, dialect: Dialect) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| format!("{} {}", quote_identifier(&c.name), c.sql_type.type_name(dialect)))
            .collect();
        format!(
            "CREATE TABLE {} ({})",
            quote_identifier(&self.table),
            columns.join(", ")
        )
    }

    /// `INSERT INTO .. (..) ` without the VALUES clause
    pub fn insert_prefix(&self) -> String {
        let columns: Vec<String> = self
            .columns
            .iter()
            .map(|c| quote_identifier(&c.name))
            .collect();
        format!(
            "INSERT INTO {} ({}) ",
            quote_identifier(&self.table),
            columns.join(", ")
        )
    }

    /// Rows per INSERT so the statement stays under the bind limit
    pub fn rows_per_batch(&self, dialect: Dialect, batch_size: usize) -> usize {
        let by_params = dialect.max_bind_params() / self.columns.len().max(1);
        batch_size.min(by_params).max(1)
    }
}

pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sales_frame() -> DataFrame {
        df! {
            "row_id" => &[1i64, 2],
            "sales" => &[100.0, 250.5],
            "returned" => &[false, true],
            "region" => &["West", "East"],
        }
        .unwrap()
    }

    #[test]
    fn test_type_mapping() {
        assert_eq!(SqlType::for_dtype(&DataType::Int64), SqlType::Integer);
        assert_eq!(SqlType::for_dtype(&DataType::UInt32), SqlType::Integer);
        assert_eq!(SqlType::for_dtype(&DataType::Float32), SqlType::Double);
        assert_eq!(SqlType::for_dtype(&DataType::Date), SqlType::Date);
        assert_eq!(SqlType::for_dtype(&DataType::String), SqlType::Text);
        assert_eq!(SqlType::for_dtype(&DataType::Null), SqlType::Text);

        assert_eq!(SqlType::Double.type_name(Dialect::Postgres), "DOUBLE PRECISION");
        assert_eq!(SqlType::Integer.type_name(Dialect::Sqlite), "INTEGER");
    }

    #[test]
    fn test_ddl() {
        let plan = TablePlan::from_frame("raw_sales_data", &sales_frame()).unwrap();

        assert_eq!(plan.drop_sql(), "DROP TABLE IF EXISTS \"raw_sales_data\"");
        assert_eq!(
            plan.create_sql(Dialect::Postgres),
            "CREATE TABLE \"raw_sales_data\" (\"row_id\" BIGINT, \"sales\" DOUBLE PRECISION, \"returned\" BOOLEAN, \"region\" TEXT)"
        );
        assert_eq!(
            plan.insert_prefix(),
            "INSERT INTO \"raw_sales_data\" (\"row_id\", \"sales\", \"returned\", \"region\") "
        );
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("order_date"), "\"order_date\"");
        assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn test_rows_per_batch() {
        let plan = TablePlan::from_frame("t", &sales_frame()).unwrap();
        assert_eq!(plan.rows_per_batch(Dialect::Postgres, 1000), 1000);
        assert_eq!(plan.rows_per_batch(Dialect::Postgres, 100_000), 65_535 / 4);
        assert_eq!(plan.rows_per_batch(Dialect::Sqlite, 100_000), 32_766 / 4);
    }

    #[test]
    fn test_empty_frame_rejected() {
        let result = TablePlan::from_frame("t", &DataFrame::empty());
        assert!(matches!(result, Err(LoaderError::DataLoading(_))));
    }
}
