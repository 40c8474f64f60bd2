use mongodb::{Client, bson::doc};
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Driver error when unhealthy
    pub message: Option<String>,
    pub response_time_ms: u64,
}

/// Ping the deployment. Used by the readiness probe.
pub async fn check_health(client: &Client) -> bool {
    ping(client).await.is_ok()
}

pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = ping(client).await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    HealthStatus {
        healthy: result.is_ok(),
        message: result.err().map(|e| e.to_string()),
        response_time_ms,
    }
}

async fn ping(client: &Client) -> mongodb::error::Result<()> {
    client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await
        .map(|_| ())
}
