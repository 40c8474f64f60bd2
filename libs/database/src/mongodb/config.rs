#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse_or};

/// Database used when no name is configured.
pub const DEFAULT_DATABASE: &str = "agrimarket";

/// MongoDB connection settings.
///
/// ```ignore
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "agrimarket")
///     .with_app_name("agrimarket-api");
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// `mongodb://[user:pass@]host[:port][/db][?options]`
    pub url: String,
    pub database: String,
    /// Reported to the server in connection handshakes
    pub app_name: Option<String>,
    pub max_pool_size: u32,
    pub min_pool_size: u32,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    pub fn with_pool_size(mut self, min: u32, max: u32) -> Self {
        self.min_pool_size = min;
        self.max_pool_size = max;
        self
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

/// Environment variables:
/// - `MONGODB_URL`, `MONGO_URL` or `MONGO_URI` (required, first one set wins)
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default: `agrimarket`)
/// - `MONGODB_APP_NAME`
/// - `MONGODB_MAX_POOL_SIZE` (default: 100), `MONGODB_MIN_POOL_SIZE` (default: 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = ["MONGODB_URL", "MONGO_URL", "MONGO_URI"]
            .iter()
            .find_map(|key| std::env::var(key).ok())
            .ok_or_else(|| {
                ConfigError::MissingEnvVar("MONGODB_URL, MONGO_URL or MONGO_URI".to_string())
            })?;

        let database = std::env::var("MONGODB_DATABASE")
            .unwrap_or_else(|_| env_or_default("MONGO_DATABASE", DEFAULT_DATABASE));

        let min_pool_size = env_parse_or("MONGODB_MIN_POOL_SIZE", 5)?;
        let max_pool_size = env_parse_or("MONGODB_MAX_POOL_SIZE", 100)?;
        if min_pool_size > max_pool_size {
            return Err(ConfigError::InvalidValue {
                key: "MONGODB_MIN_POOL_SIZE".to_string(),
                details: format!("{min_pool_size} exceeds MONGODB_MAX_POOL_SIZE ({max_pool_size})"),
            });
        }

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size,
            min_pool_size,
            connect_timeout_secs: env_parse_or("MONGODB_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse_or(
                "MONGODB_SERVER_SELECTION_TIMEOUT_SECS",
                30,
            )?,
        })
    }
}
