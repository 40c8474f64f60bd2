use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::error::MarketplaceResult;
use crate::models::Listing;
use crate::reviews::Review;

/// Result of an atomic review append.
#[derive(Debug, Clone, PartialEq)]
pub enum ReviewOutcome<L> {
    /// Stored; carries the listing with its recomputed aggregate
    Appended(L),
    /// The reviewer already has a review on this listing
    AlreadyReviewed,
    Missing,
}

/// Repository trait for listing persistence
///
/// One implementation serves all three categories through the associated
/// `Item` type. Backends: MongoDB and in-memory.
#[cfg_attr(test, mockall::automock(type Item = crate::models::SeedProduct;))]
#[async_trait]
pub trait ListingRepository: Send + Sync {
    type Item: Listing;

    async fn insert(&self, listing: Self::Item) -> MarketplaceResult<Self::Item>;

    async fn get_by_id(&self, id: Uuid) -> MarketplaceResult<Option<Self::Item>>;

    /// All listings, newest first
    async fn list(&self) -> MarketplaceResult<Vec<Self::Item>>;

    /// Listings owned by `owner`, newest first
    async fn list_by_owner(&self, owner: &str) -> MarketplaceResult<Vec<Self::Item>>;

    /// Write schema-normalized `changes` and bump `updated_at`, leaving the
    /// reviews and aggregate as stored. `None` if the listing no longer exists.
    async fn update_fields(
        &self,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> MarketplaceResult<Option<Self::Item>>;

    /// Returns `false` if nothing was deleted.
    async fn delete(&self, id: Uuid) -> MarketplaceResult<bool>;

    /// Check-and-append as one step: two concurrent reviews by the same user
    /// cannot both be stored.
    async fn append_review(
        &self,
        id: Uuid,
        review: Review,
    ) -> MarketplaceResult<ReviewOutcome<Self::Item>>;
}
