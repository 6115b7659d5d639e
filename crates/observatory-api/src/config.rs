//! Runtime configuration for the observation server.
//!
//! Settings are read once at startup, lowest precedence first:
//!
//! 1. built-in defaults
//! 2. an optional `observatory.toml` in the working directory
//! 3. an optional `.env` file in the working directory
//! 4. the process environment
//!
//! A variable already set in the process environment is never replaced by
//! the `.env` file.
//!
//! | Variable | Key | Default |
//! |----------|-----|---------|
//! | `HOST` | `host` | `0.0.0.0` |
//! | `PORT` | `port` | `5000` |
//! | `DATABASE_URL` | `database_url` | none |
//! | `OBSERVATORY_STORE` | `store` | `postgres` |
//! | `ADMIN_API_KEY` | `admin_api_key` | none |
//! | `DB_MAX_CONNECTIONS` | `db_max_connections` | `10` |
//! | `DB_CONNECT_TIMEOUT` | `db_connect_timeout` | `5` (seconds) |
//! | `DB_IDLE_TIMEOUT` | `db_idle_timeout` | `300` (seconds) |
//!
//! Empty environment values count as unset.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use observatory_db::PostgresConfig;
use observatory_db::postgres::{
    DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_IDLE_TIMEOUT_SECS, DEFAULT_MAX_CONNECTIONS,
};
use serde::Deserialize;

/// Default config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "observatory.toml";

/// Default dotenv file looked up in the working directory.
pub const DEFAULT_DOTENV_FILE: &str = ".env";

/// Variable selecting the store backend. Every other key is its variable
/// name lowercased.
const STORE_VAR: &str = "OBSERVATORY_STORE";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A source could not be read or a value has the wrong type.
    #[error("failed to load config: {0}")]
    Load(#[from] config::ConfigError),

    /// The `.env` file exists but could not be read or parsed.
    #[error("failed to read .env: {0}")]
    DotEnv(#[from] dotenvy::Error),

    /// The `PostgreSQL` store was selected without a connection string.
    #[error("DATABASE_URL is required when the postgres store is selected")]
    MissingDatabaseUrl,
}

/// Which [`ObservationStore`](observatory_db::ObservationStore) backs the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// `PostgreSQL` document store.
    #[default]
    Postgres,
    /// Process-local store; data is lost on exit.
    Memory,
}

/// Server configuration.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// TCP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Store connection string.
    #[serde(default)]
    pub database_url: Option<String>,

    /// Store backend.
    #[serde(default)]
    pub store: StoreKind,

    /// Bearer token for the admin route group. The group is not mounted
    /// when this is unset.
    #[serde(default)]
    pub admin_api_key: Option<String>,

    /// Maximum `PostgreSQL` pool size.
    #[serde(default = "default_max_connections")]
    pub db_max_connections: u32,

    /// `PostgreSQL` connection acquire timeout, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub db_connect_timeout: u64,

    /// `PostgreSQL` idle connection timeout, in seconds.
    #[serde(default = "default_idle_timeout")]
    pub db_idle_timeout: u64,
}

impl AppConfig {
    /// Load configuration from [`DEFAULT_CONFIG_FILE`], [`DEFAULT_DOTENV_FILE`]
    /// and the process environment, then validate it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if loading or validation fails.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut env: HashMap<String, String> = std::env::vars().collect();
        merge_dotenv(Path::new(DEFAULT_DOTENV_FILE), &mut env)?;
        Self::load(Some(Path::new(DEFAULT_CONFIG_FILE)), &env)
    }

    /// Load configuration from an optional file plus an explicit
    /// environment map, then validate it.
    ///
    /// A missing file is not an error. Environment values win over file
    /// values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Load`] for unreadable sources or bad values,
    /// [`ConfigError::MissingDatabaseUrl`] if validation fails.
    pub fn load(file: Option<&Path>, env: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(false));
        }

        let store = env.get(STORE_VAR).filter(|v| !v.trim().is_empty()).cloned();

        let config: Self = builder
            .add_source(
                config::Environment::default()
                    .source(Some(env.clone()))
                    .ignore_empty(true),
            )
            .set_override_option("store", store)?
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check cross-field requirements.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingDatabaseUrl`] when the `PostgreSQL`
    /// store is selected without a non-empty connection string.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let has_url = self
            .database_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty());

        if self.store == StoreKind::Postgres && !has_url {
            return Err(ConfigError::MissingDatabaseUrl);
        }
        Ok(())
    }

    /// Pool settings for the `PostgreSQL` store, if a URL is configured.
    pub fn postgres(&self) -> Option<PostgresConfig> {
        self.database_url
            .as_deref()
            .map(|url| {
                PostgresConfig::new(url)
                    .with_max_connections(self.db_max_connections)
                    .with_connect_timeout(Duration::from_secs(self.db_connect_timeout))
                    .with_idle_timeout(Duration::from_secs(self.db_idle_timeout))
            })
    }

    /// The admin bearer token, if one is configured and non-empty.
    pub fn admin_key(&self) -> Option<&str> {
        self.admin_api_key.as_deref().filter(|k| !k.is_empty())
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database_url: None,
            store: StoreKind::default(),
            admin_api_key: None,
            db_max_connections: default_max_connections(),
            db_connect_timeout: default_connect_timeout(),
            db_idle_timeout: default_idle_timeout(),
        }
    }
}

// Secrets stay out of logs.
impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("store", &self.store)
            .field("admin_api_key", &self.admin_api_key.as_ref().map(|_| "<redacted>"))
            .field("db_max_connections", &self.db_max_connections)
            .field("db_connect_timeout", &self.db_connect_timeout)
            .field("db_idle_timeout", &self.db_idle_timeout)
            .finish()
    }
}

fn default_host() -> String {
    String::from("0.0.0.0")
}

const fn default_port() -> u16 {
    5000
}

const fn default_max_connections() -> u32 {
    DEFAULT_MAX_CONNECTIONS
}

const fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

const fn default_idle_timeout() -> u64 {
    DEFAULT_IDLE_TIMEOUT_SECS
}

/// Add the entries of a dotenv file to `env`.
///
/// Variables already present in `env` keep their value. A missing file is
/// not an error.
fn merge_dotenv(path: &Path, env: &mut HashMap<String, String>) -> Result<(), ConfigError> {
    let entries = match dotenvy::from_path_iter(path) {
        Ok(entries) => entries,
        Err(e) if e.not_found() => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    for entry in entries {
        let (key, value) = entry?;
        env.entry(key).or_insert(value);
    }
    Ok(())
}
