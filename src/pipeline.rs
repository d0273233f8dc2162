use crate::config::AppConfig;
use crate::data::{connectors::DataValidator, CsvConnector, TableSummary};
use crate::error::Result;
use crate::sink::{DatabaseTarget, SqlSink};
use polars::prelude::DataFrame;

/// Outcome of one load
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub table: String,
    pub rows_written: u64,
    pub summary: TableSummary,
}

/// Load, clean and persist one CSV into one table
pub struct Loader {
    config: AppConfig,
}

impl Loader {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Read the source CSV, normalize its headers and parse the date columns
    pub fn extract(&self) -> Result<DataFrame> {
        let source = &self.config.source;
        let df = CsvConnector::load(&source.path)?;
        let df = CsvConnector::normalize_columns(df)?;
        let df = CsvConnector::parse_dates(df, &source.date_columns, &source.date_format)?;

        let null_report = DataValidator::check_nulls(&df)?;
        if !null_report.is_empty() {
            log::warn!("Null values detected: {:?}", null_report);
        }

        Ok(df)
    }

    /// Replace the destination table with `df`
    pub async fn persist(&self, df: &DataFrame, target: &DatabaseTarget) -> Result<u64> {
        let sink = SqlSink::connect(target).await?;
        let result = sink
            .replace_table(&self.config.sink.table_name, df, self.config.sink.batch_size)
            .await;
        sink.close().await;
        result
    }

    /// The whole run. The summary goes to stdout before anything touches the
    /// database; the database is only modified by the final step.
    pub async fn run(&self) -> Result<LoadReport> {
        let target = DatabaseTarget::parse(self.config.sink.database_url()?)?;

        let df = self.extract()?;
        let summary = CsvConnector::summarize(&df)?;
        println!("{}", summary);

        let rows_written = self.persist(&df, &target).await?;

        Ok(LoadReport {
            table: self.config.sink.table_name.clone(),
            rows_written,
            summary,
        })
    }
}
