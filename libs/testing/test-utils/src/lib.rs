//! Shared test utilities for domain testing
//!
//! This crate provides reusable test infrastructure for all domain crates:
//! - `TestMongo`: MongoDB container with automatic cleanup (feature: "mongo")
//! - `TestDataBuilder`: Deterministic test data generation (always available)
//! - `assertions`: Custom assertion helpers (always available)
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDataBuilder, TestMongo};
//!
//! #[tokio::test]
//! #[ignore = "requires Docker"]
//! async fn my_mongo_test() {
//!     let mongo = TestMongo::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let db = mongo.database(&builder.name("db", "main"));
//!     let owner = builder.user_id().to_string();
//! }
//! ```

use uuid::Uuid;

#[cfg(feature = "mongo")]
mod mongo;

#[cfg(feature = "mongo")]
pub use mongo::TestMongo;

/// Builder for test data with deterministic randomization
///
/// This ensures tests are reproducible by using seeded random data.
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    /// Create a new builder with a seed (for deterministic tests)
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Create from test name (generates seed from test name hash)
    ///
    /// This is the recommended way to create a builder for consistent test data.
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("test_create_listing");
    /// ```
    pub fn from_test_name(name: &str) -> Self {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// Generate a unique user ID for testing (owners and reviewers)
    pub fn user_id(&self) -> Uuid {
        // Use seed to generate deterministic UUID
        let bytes = self.seed.to_le_bytes();
        let mut uuid_bytes = [0u8; 16];
        uuid_bytes[..8].copy_from_slice(&bytes);
        uuid_bytes[8..16].copy_from_slice(&bytes);
        Uuid::from_bytes(uuid_bytes)
    }

    /// Generate a unique name for testing
    ///
    /// # Arguments
    ///
    /// * `prefix` - The type of resource (e.g., "seed", "machine")
    /// * `suffix` - A unique identifier within the test (e.g., "main", "backup")
    ///
    /// # Example
    ///
    /// ```
    /// use test_utils::TestDataBuilder;
    ///
    /// let builder = TestDataBuilder::from_test_name("my_test");
    /// let name = builder.name("seed", "maize");
    /// // Returns: "test-seed-12345-maize"
    /// ```
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// Distinct string user id per `index`, stable for this seed
    pub fn reviewer(&self, index: u32) -> String {
        format!("reviewer-{}-{}", self.seed, index)
    }

    /// Rating in 1..=5 derived from the seed and `index`
    pub fn rating(&self, index: u32) -> i32 {
        ((self.seed.wrapping_add(u64::from(index))) % 5) as i32 + 1
    }
}

/// Test assertion helpers
pub mod assertions {
    /// Assert two averages agree to within `1e-9`
    pub fn assert_close(actual: f64, expected: f64, context: &str) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "{}: expected {}, got {}",
            context, expected, actual
        );
    }

    /// Assert that an optional value is Some
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }
}
