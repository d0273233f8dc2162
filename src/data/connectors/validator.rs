use crate::error::{LoaderError, Result};
use polars::prelude::*;
use std::collections::HashSet;

pub struct DataValidator;

impl DataValidator {
    /// Fail on the first column in `required` the frame doesn't have
    pub fn require_columns(df: &DataFrame, required: &[String]) -> Result<()> {
        let columns = df.get_column_names();
        for name in required {
            if !columns.iter().any(|col| col.as_str() == name) {
                return Err(LoaderError::MissingColumn(format!(
                    "{} (available: {:?})",
                    name,
                    columns.iter().map(|c| c.as_str()).collect::<Vec<_>>()
                )));
            }
        }
        Ok(())
    }

    /// Reject header sets where two names collide
    pub fn ensure_unique_names(names: &[String]) -> Result<()> {
        let mut seen = HashSet::with_capacity(names.len());
        for name in names {
            if !seen.insert(name.as_str()) {
                return Err(LoaderError::DataLoading(format!(
                    "Duplicate column name after normalization: {}",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Columns containing nulls, with their null counts
    pub fn check_nulls(df: &DataFrame) -> Result<Vec<(String, usize)>> {
        let mut null_report = Vec::new();

        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            if null_count > 0 {
                null_report.push((col_name.to_string(), null_count));
            }
        }

        Ok(null_report)
    }
}
