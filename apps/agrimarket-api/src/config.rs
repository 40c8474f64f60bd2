use axum_helpers::JwtConfig;
use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};
use database::mongodb::MongoConfig;
use std::str::FromStr;
use strum::{Display, EnumString};

pub use core_config::Environment;

/// Where listings are stored, from `STORAGE_BACKEND`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum StorageBackend {
    Mongodb,
    /// Process-local maps; data is lost on restart
    Memory,
}

impl FromEnv for StorageBackend {
    fn from_env() -> Result<Self, ConfigError> {
        let raw = env_or_default("STORAGE_BACKEND", "mongodb");
        StorageBackend::from_str(raw.trim()).map_err(|_| ConfigError::InvalidValue {
            key: "STORAGE_BACKEND".to_string(),
            details: format!("expected 'mongodb' or 'memory', got '{raw}'"),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub storage: StorageBackend,
    /// Present when `storage` is [`StorageBackend::Mongodb`]
    pub mongodb: Option<MongoConfig>,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let storage = StorageBackend::from_env()?;
        let mongodb = match storage {
            StorageBackend::Mongodb => Some(MongoConfig::from_env()?),
            StorageBackend::Memory => None,
        };

        Ok(Self {
            app: app_info!(),
            storage,
            mongodb,
            server: ServerConfig::from_env()?,
            jwt: JwtConfig::from_env()?,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "config-test-secret-that-is-long-enough";

    #[test]
    fn test_memory_backend_skips_mongo() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", Some("Memory")),
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", None),
                ("MONGO_URL", None),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::Memory);
                assert!(config.mongodb.is_none());
                assert_eq!(config.app.name, "agrimarket_api");
            },
        );
    }

    #[test]
    fn test_mongodb_backend_by_default() {
        temp_env::with_vars(
            [
                ("STORAGE_BACKEND", None),
                ("JWT_SECRET", Some(SECRET)),
                ("MONGODB_URL", Some("mongodb://db:27017")),
                ("MONGODB_DATABASE", Some("market")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert_eq!(config.storage, StorageBackend::Mongodb);
                let mongodb = config.mongodb.unwrap();
                assert_eq!(mongodb.url, "mongodb://db:27017");
                assert_eq!(mongodb.database, "market");
            },
        );
    }

    #[test]
    fn test_requires_jwt_secret() {
        temp_env::with_vars(
            [("STORAGE_BACKEND", Some("memory")), ("JWT_SECRET", None)],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("JWT_SECRET"));
            },
        );
    }

    #[test]
    fn test_unknown_backend_rejected() {
        temp_env::with_var("STORAGE_BACKEND", Some("postgres"), || {
            let err = StorageBackend::from_env().unwrap_err();
            assert!(err.to_string().contains("STORAGE_BACKEND"));
        });
    }
}
