use std::env;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use validator::Validate;

/// Environment used to pick `config/<env>.yaml` when `APP_ENV` is unset.
const DEFAULT_APP_ENV: &str = "local";

/// Entry of `cors_allowed_origins` that allows every origin.
pub const ANY_ORIGIN: &str = "*";

/// Runtime configuration of the upload service.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the HTTP server binds to.
    #[validate(length(min = 1))]
    pub address: String,
    /// Port the HTTP server listens on.
    #[validate(range(min = 1))]
    pub port: u16,
    /// Path of the SQLite database file.
    #[validate(length(min = 1))]
    pub database_url: String,
    /// Content directory for uploaded files.
    #[validate(length(min = 1))]
    pub upload_dir: String,
    /// Maximum size in bytes of a whole multipart body.
    #[validate(range(min = 1))]
    pub upload_total_limit: usize,
    /// Maximum size in bytes of multipart data buffered in memory.
    #[validate(range(min = 1))]
    pub upload_memory_limit: usize,
    /// Origins allowed to call the API from a browser. `*` allows any.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "0.0.0.0".to_string(),
            port: 5000,
            database_url: "supplier_uploads.db".to_string(),
            upload_dir: "uploads".to_string(),
            upload_total_limit: 110 * 1024 * 1024,
            upload_memory_limit: 2 * 1024 * 1024,
            cors_allowed_origins: vec![ANY_ORIGIN.to_string()],
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read configuration: {0}")]
    Source(#[from] ::config::ConfigError),
    #[error("invalid configuration: {0}")]
    Invalid(#[from] validator::ValidationErrors),
}

impl ServerConfig {
    /// Loads defaults, `config/default.yaml`, `config/<APP_ENV>.yaml` and
    /// `APP_*` environment variables, later sources winning.
    pub fn load() -> Result<Self, ConfigLoadError> {
        let app_env = env::var("APP_ENV").unwrap_or_else(|_| DEFAULT_APP_ENV.to_string());
        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{app_env}")).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins"),
            );
        Self::from_builder(builder)
    }

    fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigLoadError> {
        let server_config: Self = builder.build()?.try_deserialize()?;
        server_config.validate()?;
        Ok(server_config)
    }
}
