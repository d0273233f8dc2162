use super::{sink::SinkConfig, source::SourceConfig, traits::ConfigSection};
use crate::error::LoaderError;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Base name of the optional config file looked up in the working directory
pub const DEFAULT_CONFIG_NAME: &str = "sales_loader";
pub const ENV_PREFIX: &str = "SALES_LOADER";
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub sink: SinkConfig,
}

impl AppConfig {
    pub fn validate(&self) -> Result<(), LoaderError> {
        validate_section(&self.source)?;
        validate_section(&self.sink)?;
        Ok(())
    }
}

fn validate_section<S: ConfigSection>(section: &S) -> Result<(), LoaderError> {
    section.validate().map_err(|e| match e {
        LoaderError::Configuration(msg) => {
            LoaderError::Configuration(format!("[{}] {}", S::section_name(), msg))
        }
        other => other,
    })
}

#[derive(Debug, Clone)]
enum ConfigFile {
    Optional(String),
    Required(PathBuf),
}

/// Layers defaults, an optional config file, `SALES_LOADER__*` variables and
/// `DATABASE_URL` into an [`AppConfig`].
pub struct ConfigManager {
    file: Option<ConfigFile>,
    database_url: Option<String>,
    read_env: bool,
}

impl ConfigManager {
    /// No file, no environment. Mostly useful in tests.
    pub fn new() -> Self {
        Self {
            file: None,
            database_url: None,
            read_env: false,
        }
    }

    /// The sources a normal run uses. Call `dotenvy::dotenv()` first if a
    /// `.env` file should contribute.
    pub fn from_env() -> Self {
        Self {
            file: Some(ConfigFile::Optional(DEFAULT_CONFIG_NAME.to_string())),
            database_url: std::env::var(DATABASE_URL_VAR).ok(),
            read_env: true,
        }
    }

    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.file = Some(ConfigFile::Required(path.as_ref().to_path_buf()));
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    pub fn load(&self) -> Result<AppConfig, LoaderError> {
        let mut builder = Config::builder();

        match &self.file {
            Some(ConfigFile::Optional(name)) => {
                builder = builder.add_source(File::with_name(name).required(false));
            }
            Some(ConfigFile::Required(path)) => {
                builder = builder.add_source(File::from(path.as_path()).required(true));
            }
            None => {}
        }

        if self.read_env {
            builder = builder.add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("source.date_columns")
                    .try_parsing(true),
            );
        }

        if let Some(url) = &self.database_url {
            builder = builder.set_override("sink.database_url", url.clone())?;
        }

        let config: AppConfig = builder.build()?.try_deserialize()?;
        config.validate()?;

        log::debug!(
            "loaded config: source={} table={} batch_size={}",
            config.source.path.display(),
            config.sink.table_name,
            config.sink.batch_size
        );
        Ok(config)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_with_database_url() {
        let config = ConfigManager::new()
            .with_database_url("sqlite::memory:")
            .load()
            .unwrap();

        assert_eq!(config.source.path, PathBuf::from("./kaggle/input/sales-forecasting/train.csv"));
        assert_eq!(config.source.date_columns, vec!["order_date", "ship_date"]);
        assert_eq!(config.source.date_format, "%d/%m/%Y");
        assert_eq!(config.sink.table_name, "raw_sales_data");
        assert_eq!(config.sink.database_url.as_deref(), Some("sqlite::memory:"));
    }

    #[test]
    fn test_missing_database_url_is_fatal() {
        match ConfigManager::new().load() {
            Err(LoaderError::Configuration(msg)) => assert!(msg.starts_with("[sink]")),
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn test_file_overrides_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[source]\npath = \"data/sales.csv\"\n\n[sink]\ntable_name = \"staging_sales\"\nbatch_size = 250\ndatabase_url = \"sqlite://from-file.db\""
        )
        .unwrap();

        let config = ConfigManager::new()
            .with_file(file.path())
            .with_database_url("sqlite://from-env.db")
            .load()
            .unwrap();

        assert_eq!(config.source.path, PathBuf::from("data/sales.csv"));
        assert_eq!(config.source.date_columns.len(), 2);
        assert_eq!(config.sink.table_name, "staging_sales");
        assert_eq!(config.sink.batch_size, 250);
        // DATABASE_URL wins over the file
        assert_eq!(config.sink.database_url.as_deref(), Some("sqlite://from-env.db"));
    }

    #[test]
    fn test_required_file_missing() {
        let result = ConfigManager::new()
            .with_file("does/not/exist.toml")
            .with_database_url("sqlite::memory:")
            .load();
        assert!(matches!(result, Err(LoaderError::Config(_))));
    }
}
