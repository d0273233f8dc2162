use super::traits::ConfigSection;
use crate::error::LoaderError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_SOURCE_PATH: &str = "./kaggle/input/sales-forecasting/train.csv";
pub const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Columns parsed as dates, matched after header normalization
    pub date_columns: Vec<String>,
    pub date_format: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_SOURCE_PATH),
            date_columns: vec!["order_date".to_string(), "ship_date".to_string()],
            date_format: DEFAULT_DATE_FORMAT.to_string(),
        }
    }
}

impl ConfigSection for SourceConfig {
    fn section_name() -> &'static str {
        "source"
    }

    fn validate(&self) -> Result<(), LoaderError> {
        if self.path.as_os_str().is_empty() {
            return Err(LoaderError::Configuration(
                "Source path must not be empty".to_string()
            ));
        }
        if self.date_columns.is_empty() {
            return Err(LoaderError::Configuration(
                "At least one date column is required".to_string()
            ));
        }
        if self.date_format.trim().is_empty() {
            return Err(LoaderError::Configuration(
                "Date format must not be empty".to_string()
            ));
        }
        Ok(())
    }
}
