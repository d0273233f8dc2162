use super::traits::ConfigSection;
use crate::error::LoaderError;
use serde::{Deserialize, Serialize};

pub const DEFAULT_TABLE_NAME: &str = "raw_sales_data";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SinkConfig {
    /// Filled from `DATABASE_URL`
    pub database_url: Option<String>,
    pub table_name: String,
    /// Rows per INSERT statement, further capped by the backend's bind limit
    pub batch_size: usize,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            table_name: DEFAULT_TABLE_NAME.to_string(),
            batch_size: 1000,
        }
    }
}

impl SinkConfig {
    pub fn database_url(&self) -> Result<&str, LoaderError> {
        match self.database_url.as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(url),
            _ => Err(LoaderError::Configuration(
                "DATABASE_URL is not set".to_string()
            )),
        }
    }
}

impl ConfigSection for SinkConfig {
    fn section_name() -> &'static str {
        "sink"
    }

    fn validate(&self) -> Result<(), LoaderError> {
        self.database_url()?;
        if self.table_name.trim().is_empty() {
            return Err(LoaderError::Configuration(
                "Table name must not be empty".to_string()
            ));
        }
        if self.batch_size == 0 {
            return Err(LoaderError::Configuration(
                "Batch size must be positive".to_string()
            ));
        }
        Ok(())
    }
}
