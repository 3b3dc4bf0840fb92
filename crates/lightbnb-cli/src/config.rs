//! Application configuration.
//!
//! Values come from `lightbnb.toml` (or the file named by `--config` /
//! `LIGHTBNB_CONFIG`), then from `LIGHTBNB__*` environment variables, e.g.
//! `LIGHTBNB__DATABASE__POOL_SIZE=4`.

use lightbnb_db_postgres::PostgresConfig;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_FILE: &str = "lightbnb.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub database: PostgresConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "warn".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.database.validate()?;
        if self.logging.level.trim().is_empty() {
            anyhow::bail!("logging.level must not be empty");
        }
        Ok(())
    }

    /// Replaces the database URL when one was given on the command line.
    #[must_use]
    pub fn with_database_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.database.url = url;
        }
        self
    }
}

pub mod loader {
    use std::path::Path;

    use anyhow::Context;
    use config::{Config, Environment, File, Map};

    use super::{AppConfig, DEFAULT_CONFIG_FILE};

    /// Loads the configuration without validating it.
    ///
    /// Command-line overrides are applied on top, so call
    /// [`AppConfig::validate`] once they are in place. An explicit `path`
    /// must exist; the default file is optional.
    pub fn load_config(path: Option<&Path>) -> anyhow::Result<AppConfig> {
        load_config_from(path, None)
    }

    pub(crate) fn load_config_from(
        path: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> anyhow::Result<AppConfig> {
        let file = match path {
            Some(p) => File::from(p).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        // Environment variable overrides, e.g., LIGHTBNB__DATABASE__URL=postgres://...
        let cfg = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix("LIGHTBNB")
                    .try_parsing(true)
                    .separator("__")
                    .source(env),
            )
            .build()
            .context("config build error")?;

        cfg.try_deserialize().context("config deserialize error")
    }
}
