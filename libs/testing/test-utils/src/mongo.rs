//! MongoDB test infrastructure
//!
//! Provides a `TestMongo` helper that starts a MongoDB container for testing.

use mongodb::{Client, Database};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, ImageExt};
use testcontainers_modules::mongo::Mongo;

/// Test MongoDB wrapper that ensures proper cleanup
///
/// The container is automatically stopped and removed when this struct is dropped.
///
/// # Example
///
/// ```no_run
/// use test_utils::TestMongo;
///
/// # async fn example() {
/// let mongo = TestMongo::new().await;
/// let db = mongo.database("listings");
/// # }
/// ```
pub struct TestMongo {
    #[allow(dead_code)]
    container: ContainerAsync<Mongo>,
    client: Client,
    pub connection_string: String,
}

impl TestMongo {
    /// Start a MongoDB 7 container and connect to it
    pub async fn new() -> Self {
        let container = Mongo::default()
            .with_tag("7.0")
            .start()
            .await
            .expect("Failed to start MongoDB container");

        let host_port = container
            .get_host_port_ipv4(27017)
            .await
            .expect("Failed to get MongoDB port");

        let connection_string = format!("mongodb://127.0.0.1:{}", host_port);

        let client = Client::with_uri_str(&connection_string)
            .await
            .expect("Failed to connect to MongoDB");

        tracing::info!(port = host_port, "Test MongoDB ready (mongo 7.0)");

        Self {
            container,
            client,
            connection_string,
        }
    }

    pub fn client(&self) -> Client {
        self.client.clone()
    }

    /// A database on the container. Use a distinct name per test for isolation.
    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }
}
