//! Database connectors for the marketplace services.
//!
//! Only MongoDB is wired today. Each backend lives behind a cargo feature so an
//! app pays only for the drivers it links.
//!
//! # Features
//!
//! - `mongodb` (default) - MongoDB client, config and health checks
//! - `config` - `core_config::FromEnv` implementations for the backend configs
//!
//! ```ignore
//! use database::mongodb::{MongoConfig, connect_from_config_with_retry};
//! use core_config::FromEnv;
//!
//! let config = MongoConfig::from_env()?;
//! let client = connect_from_config_with_retry(&config, None).await?;
//! let db = client.database(&config.database);
//! ```

pub mod common;

#[cfg(feature = "mongodb")]
pub mod mongodb;

pub use common::{RetryConfig, retry, retry_with_backoff};
