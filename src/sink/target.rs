use crate::error::{LoaderError, Result};
use url::Url;

/// SQL backends the sink can write to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Postgres,
    Sqlite,
}

impl Dialect {
    /// Upper bound on bind parameters in one statement
    pub fn max_bind_params(&self) -> usize {
        match self {
            Self::Postgres => 65_535,
            Self::Sqlite => 32_766,
        }
    }
}

/// A parsed `DATABASE_URL`
#[derive(Debug, Clone)]
pub struct DatabaseTarget {
    pub dialect: Dialect,
    /// Connection string handed to the driver
    pub url: String,
}

impl DatabaseTarget {
    /// Accepts `postgres://`, `postgresql://` and `sqlite:` URLs. A
    /// SQLAlchemy-style driver suffix (`postgresql+psycopg2://`) is dropped.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (scheme, rest) = raw.split_once(':').ok_or_else(|| {
            LoaderError::Configuration(format!(
                "DATABASE_URL has no scheme: {}",
                redact(raw)
            ))
        })?;

        let base = scheme.split('+').next().unwrap_or(scheme).to_lowercase();
        let dialect = match base.as_str() {
            "postgres" | "postgresql" => Dialect::Postgres,
            "sqlite" => Dialect::Sqlite,
            other => {
                return Err(LoaderError::Configuration(format!(
                    "Unsupported database scheme '{}'",
                    other
                )))
            }
        };

        Ok(Self {
            dialect,
            url: format!("{}:{}", base, rest),
        })
    }

    /// Connection string safe to log
    pub fn redacted(&self) -> String {
        redact(&self.url)
    }
}

fn redact(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            if url.password().is_some() {
                let _ = url.set_password(Some("***"));
            }
            url.to_string()
        }
        Err(_) => raw
            .split_once(':')
            .map(|(scheme, _)| format!("{}:<unparsed>", scheme))
            .unwrap_or_else(|| "<unparsed>".to_string()),
    }
}
