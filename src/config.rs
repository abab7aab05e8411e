use std::sync::Arc;
use std::time::Duration;

use sea_orm::{ConnectOptions, Database};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ConfigError;
use crate::memory_store::MemoryStore;
use crate::seaorm_store::SeaOrmStore;
use crate::store::ReservationStore;

/// Which [`ReservationStore`] implementation to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process-lifetime state, lost on exit.
    #[default]
    Memory,
    /// Sea-ORM over `database_url`.
    Database,
}

/// Startup configuration for the reservation store.
///
/// | Variable                     | Field                  | Default                              |
/// |------------------------------|------------------------|--------------------------------------|
/// | `RESERVATION_BACKEND`        | `backend`              | `database` if `DATABASE_URL` is set, else `memory` |
/// | `DATABASE_URL`               | `database_url`         | none                                 |
/// | `DATABASE_MAX_CONNECTIONS`   | `max_connections`      | 10                                   |
/// | `DATABASE_MIN_CONNECTIONS`   | `min_connections`      | 2                                    |
/// | `DATABASE_CONNECT_TIMEOUT`   | `connect_timeout_secs` | 10                                   |
/// | `RESERVATION_RUN_MIGRATIONS` | `run_migrations`       | true                                 |
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    pub run_migrations: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            database_url: None,
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 10,
            run_migrations: true,
        }
    }
}

impl StoreConfig {
    pub fn memory() -> Self {
        Self::default()
    }

    pub fn database(url: impl Into<String>) -> Self {
        Self {
            backend: Backend::Database,
            database_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from any key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let database_url = lookup("DATABASE_URL").filter(|url| !url.trim().is_empty());

        let backend = match lookup("RESERVATION_BACKEND") {
            Some(value) => match value.trim().to_ascii_lowercase().as_str() {
                "memory" => Backend::Memory,
                "database" => Backend::Database,
                _ => return Err(ConfigError::UnknownBackend(value)),
            },
            None if database_url.is_some() => Backend::Database,
            None => Backend::Memory,
        };
        if backend == Backend::Database && database_url.is_none() {
            return Err(ConfigError::MissingDatabaseUrl);
        }

        Ok(Self {
            backend,
            database_url,
            max_connections: parse_var(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                defaults.max_connections,
            )?,
            min_connections: parse_var(
                &lookup,
                "DATABASE_MIN_CONNECTIONS",
                defaults.min_connections,
            )?,
            connect_timeout_secs: parse_var(
                &lookup,
                "DATABASE_CONNECT_TIMEOUT",
                defaults.connect_timeout_secs,
            )?,
            run_migrations: match lookup("RESERVATION_RUN_MIGRATIONS") {
                Some(value) => parse_flag("RESERVATION_RUN_MIGRATIONS", &value)?,
                None => defaults.run_migrations,
            },
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value }),
        None => Ok(default),
    }
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key,
            value: value.to_string(),
        }),
    }
}

/// Builds the store selected by `config`.
///
/// For the database backend this opens a connection pool and, when
/// `run_migrations` is set and the `migration` feature is enabled, brings the schema
/// up to date.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn ReservationStore>, ConfigError> {
    match config.backend {
        Backend::Memory => {
            info!("using in-memory reservation store");
            Ok(Arc::new(MemoryStore::new()))
        }
        Backend::Database => {
            let url = config
                .database_url
                .clone()
                .ok_or(ConfigError::MissingDatabaseUrl)?;
            let timeout = Duration::from_secs(config.connect_timeout_secs);

            let mut opt = ConnectOptions::new(url);
            opt.max_connections(config.max_connections)
                .min_connections(config.min_connections.min(config.max_connections))
                .connect_timeout(timeout)
                .acquire_timeout(timeout)
                .sqlx_logging(false);

            let conn = Database::connect(opt).await?;
            info!("connected to reservation database");

            if config.run_migrations {
                run_migrations(&conn).await?;
            }
            Ok(Arc::new(SeaOrmStore::new(conn)))
        }
    }
}

#[cfg(feature = "migration")]
async fn run_migrations(conn: &sea_orm::DatabaseConnection) -> Result<(), ConfigError> {
    use sea_orm_migration::MigratorTrait;

    crate::migration::Migrator::up(conn, None).await?;
    info!("reservation schema is up to date");
    Ok(())
}

#[cfg(not(feature = "migration"))]
async fn run_migrations(_conn: &sea_orm::DatabaseConnection) -> Result<(), ConfigError> {
    tracing::warn!("run_migrations is set but the `migration` feature is disabled");
    Ok(())
}
