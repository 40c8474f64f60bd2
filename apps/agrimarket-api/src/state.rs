//! Application state management.
//!
//! The state is built once at startup and handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloned per router (inexpensive Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// Verifies bearer tokens on protected routes
    pub jwt: JwtAuth,
    /// `None` when running on the in-memory backend
    pub mongo: Option<MongoState>,
}

#[derive(Clone)]
pub struct MongoState {
    /// Shares the driver's connection pool
    pub client: Client,
    pub db: Database,
}

#[cfg(test)]
impl AppState {
    /// In-memory state with a fixed test secret.
    pub fn for_tests() -> Self {
        use crate::config::{Config, Environment, StorageBackend};
        use axum_helpers::JwtConfig;
        use core_config::{app_info, server::ServerConfig};

        let jwt = JwtConfig::new("app-state-test-secret-long-enough!!");
        Self {
            jwt: JwtAuth::new(&jwt),
            config: Config {
                app: app_info!(),
                storage: StorageBackend::Memory,
                mongodb: None,
                server: ServerConfig::default(),
                jwt,
                environment: Environment::Development,
            },
            mongo: None,
        }
    }
}
