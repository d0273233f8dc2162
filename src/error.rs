use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Source file not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Data loading error: {0}")]
    DataLoading(String),

    #[error("Missing column: {0}")]
    MissingColumn(String),

    #[error("Date parse error in column '{column}' at row {row}: '{value}' does not match {format}")]
    DateParse {
        column: String,
        row: usize,
        value: String,
        format: String,
    },

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type Result<T> = std::result::Result<T, LoaderError>;
