use mongodb::{Client, bson::doc, options::ClientOptions};
use std::time::Duration;
use tracing::{info, instrument};

use super::MongoConfig;
use crate::common::{RetryConfig, retry, retry_with_backoff};

#[derive(Debug, thiserror::Error)]
pub enum MongoError {
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
}

/// Connect with driver defaults for everything but the URL.
pub async fn connect(url: &str) -> Result<Client, MongoError> {
    connect_from_config(&MongoConfig::new(url)).await
}

/// Build a client from `config` and ping the server before handing it out.
///
/// The driver connects lazily, so without the ping a bad URL would only
/// surface on the first request.
#[instrument(skip(config), fields(database = %config.database))]
pub async fn connect_from_config(config: &MongoConfig) -> Result<Client, MongoError> {
    let mut options = ClientOptions::parse(&config.url).await?;

    options.max_pool_size = Some(config.max_pool_size);
    options.min_pool_size = Some(config.min_pool_size);
    options.connect_timeout = Some(Duration::from_secs(config.connect_timeout_secs));
    options.server_selection_timeout =
        Some(Duration::from_secs(config.server_selection_timeout_secs));
    if let Some(app_name) = &config.app_name {
        options.app_name = Some(app_name.clone());
    }

    let client = Client::with_options(options)?;

    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map_err(|e| MongoError::ConnectionFailed(e.to_string()))?;

    info!("Connected to MongoDB");
    Ok(client)
}

/// [`connect`] wrapped in [`retry_with_backoff`]; `None` uses the default policy.
pub async fn connect_with_retry(
    url: &str,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    match retry_config {
        Some(config) => retry_with_backoff(|| connect(url), config).await,
        None => retry(|| connect(url)).await,
    }
}

/// [`connect_from_config`] wrapped in [`retry_with_backoff`].
pub async fn connect_from_config_with_retry(
    config: &MongoConfig,
    retry_config: Option<RetryConfig>,
) -> Result<Client, MongoError> {
    match retry_config {
        Some(policy) => retry_with_backoff(|| connect_from_config(config), policy).await,
        None => retry(|| connect_from_config(config)).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_rejects_malformed_url() {
        let err = connect("not-a-mongo-url").await.unwrap_err();
        assert!(matches!(err, MongoError::Mongo(_)));
    }

    #[tokio::test]
    #[ignore] // Requires actual MongoDB
    async fn test_connect_from_config() {
        let url = std::env::var("MONGODB_URL")
            .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
        let config = MongoConfig::with_database(url, "agrimarket_test");
        assert!(connect_from_config(&config).await.is_ok());
    }
}
