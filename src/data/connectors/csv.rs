use crate::error::{LoaderError, Result};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use polars::prelude::*;
use regex::Regex;
use std::path::Path;
use super::{
    types::{ColumnStats, TableSummary},
    validator::DataValidator,
};

static SEPARATOR_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]+").expect("separator pattern is valid"));

/// Lowercase a header and collapse every run of whitespace and hyphens into one `_`.
///
/// `"Order Date"` becomes `order_date`, `"Ship-Mode"` becomes `ship_mode`.
/// Leading or trailing separators are kept as a single underscore.
pub fn normalize_column_name(name: &str) -> String {
    SEPARATOR_RUN
        .replace_all(&name.to_lowercase(), "_")
        .into_owned()
}

/// Anchored pattern pinning the field widths of a numeric date format:
/// `%Y` is exactly 4 digits, `%y` exactly 2, `%d`/`%m` 1 or 2.
/// `None` when the format uses other directives; chrono alone decides then.
fn strict_shape(format: &str) -> Option<Regex> {
    let mut pattern = String::from("^");
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            pattern.push_str(&regex::escape(&c.to_string()));
            continue;
        }
        match chars.next()? {
            'Y' => pattern.push_str(r"\d{4}"),
            'y' => pattern.push_str(r"\d{2}"),
            'd' | 'm' => pattern.push_str(r"\d{1,2}"),
            '%' => pattern.push('%'),
            _ => return None,
        }
    }
    pattern.push('$');
    Regex::new(&pattern).ok()
}

pub struct CsvConnector;

impl CsvConnector {
    /// Load CSV file into DataFrame
    pub fn load<P: AsRef<Path>>(path: P) -> Result<DataFrame> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::SourceNotFound(path.to_path_buf()));
        }

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(None)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| LoaderError::DataLoading(format!("Failed to read CSV: {}", e)))?;

        log::info!(
            "loaded {} rows x {} columns from {}",
            df.height(),
            df.width(),
            path.display()
        );
        Ok(df)
    }

    /// Rename every column with [`normalize_column_name`]
    pub fn normalize_columns(mut df: DataFrame) -> Result<DataFrame> {
        let original: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        let normalized: Vec<String> = original
            .iter()
            .map(|name| normalize_column_name(name))
            .collect();

        DataValidator::ensure_unique_names(&normalized)?;

        for (before, after) in original.iter().zip(&normalized) {
            if before != after {
                log::debug!("renamed column '{}' -> '{}'", before, after);
            }
        }

        df.set_column_names(normalized.iter().map(|s| s.as_str()))
            .map_err(|e| LoaderError::DataLoading(format!("Failed to rename columns: {}", e)))?;

        Ok(df)
    }

    /// Parse each named column as a calendar date with `format`.
    ///
    /// String columns are parsed strictly: any non-null value that doesn't
    /// match fails the whole call. Null cells stay null. Columns that already
    /// hold dates are left alone, so re-running on parsed output is a no-op.
    pub fn parse_dates(mut df: DataFrame, columns: &[String], format: &str) -> Result<DataFrame> {
        DataValidator::require_columns(&df, columns)?;

        for name in columns {
            let column = df.column(name)?;
            let parsed = match column.dtype() {
                DataType::Date => continue,
                DataType::String => Self::parse_date_strings(name, column.str()?, format)?,
                DataType::Null => column.cast(&DataType::Date)?.as_materialized_series().clone(),
                other => {
                    return Err(LoaderError::DataLoading(format!(
                        "Column '{}' must hold date strings, found {}",
                        name, other
                    )))
                }
            };
            df.with_column(parsed)?;
            log::debug!("parsed '{}' as {}", name, format);
        }

        log::info!("parsed date columns {:?}", columns);
        Ok(df)
    }

    fn parse_date_strings(name: &str, values: &StringChunked, format: &str) -> Result<Series> {
        let shape = strict_shape(format);
        let mut parsed: Vec<Option<NaiveDate>> = Vec::with_capacity(values.len());
        for (row, value) in values.into_iter().enumerate() {
            let date = match value {
                Some(raw) => {
                    let fail = || LoaderError::DateParse {
                        column: name.to_string(),
                        row,
                        value: raw.to_string(),
                        format: format.to_string(),
                    };
                    // chrono takes any digit count for %Y; the field widths are checked here
                    if shape.as_ref().is_some_and(|re| !re.is_match(raw)) {
                        return Err(fail());
                    }
                    Some(NaiveDate::parse_from_str(raw, format).map_err(|_| fail())?)
                }
                None => None,
            };
            parsed.push(date);
        }

        Ok(DateChunked::from_naive_date_options(name.into(), parsed).into_series())
    }

    /// Row count, per-column dtype and null counts
    pub fn summarize(df: &DataFrame) -> Result<TableSummary> {
        let mut columns = Vec::with_capacity(df.width());
        for col_name in df.get_column_names() {
            let series = df.column(col_name)?;
            let null_count = series.null_count();
            columns.push(ColumnStats {
                name: col_name.to_string(),
                dtype: series.dtype().to_string(),
                non_null_count: series.len() - null_count,
                null_count,
            });
        }

        Ok(TableSummary {
            num_rows: df.height(),
            num_columns: df.width(),
            columns,
            estimated_bytes: df.estimated_size(),
        })
    }
}
