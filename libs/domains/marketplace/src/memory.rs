//! In-memory repository for development and tests.

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::MarketplaceResult;
use crate::models::Listing;
use crate::repository::{ListingRepository, ReviewOutcome};
use crate::reviews::Review;

pub struct InMemoryListingRepository<L> {
    listings: Arc<RwLock<HashMap<Uuid, L>>>,
    _marker: PhantomData<fn() -> L>,
}

impl<L> InMemoryListingRepository<L> {
    pub fn new() -> Self {
        Self {
            listings: Arc::new(RwLock::new(HashMap::new())),
            _marker: PhantomData,
        }
    }
}

impl<L> Default for InMemoryListingRepository<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L> Clone for InMemoryListingRepository<L> {
    fn clone(&self) -> Self {
        Self {
            listings: Arc::clone(&self.listings),
            _marker: PhantomData,
        }
    }
}

fn newest_first<L: Listing>(mut listings: Vec<L>) -> Vec<L> {
    // v7 ids sort by creation time
    listings.sort_by_key(|l| std::cmp::Reverse(l.id()));
    listings
}

#[async_trait]
impl<L: Listing> ListingRepository for InMemoryListingRepository<L> {
    type Item = L;

    async fn insert(&self, listing: L) -> MarketplaceResult<L> {
        self.listings
            .write()
            .await
            .insert(listing.id(), listing.clone());
        Ok(listing)
    }

    async fn get_by_id(&self, id: Uuid) -> MarketplaceResult<Option<L>> {
        Ok(self.listings.read().await.get(&id).cloned())
    }

    async fn list(&self) -> MarketplaceResult<Vec<L>> {
        let listings = self.listings.read().await.values().cloned().collect();
        Ok(newest_first(listings))
    }

    async fn list_by_owner(&self, owner: &str) -> MarketplaceResult<Vec<L>> {
        let listings = self
            .listings
            .read()
            .await
            .values()
            .filter(|l| l.owner() == owner)
            .cloned()
            .collect();
        Ok(newest_first(listings))
    }

    async fn update_fields(
        &self,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> MarketplaceResult<Option<L>> {
        let mut listings = self.listings.write().await;
        let Some(stored) = listings.get_mut(&id) else {
            return Ok(None);
        };

        stored.apply_changes(changes)?;
        Ok(Some(stored.clone()))
    }

    async fn delete(&self, id: Uuid) -> MarketplaceResult<bool> {
        Ok(self.listings.write().await.remove(&id).is_some())
    }

    async fn append_review(&self, id: Uuid, review: Review) -> MarketplaceResult<ReviewOutcome<L>> {
        let mut listings = self.listings.write().await;
        let Some(listing) = listings.get_mut(&id) else {
            return Ok(ReviewOutcome::Missing);
        };

        if listing.reviews_mut().append(review).is_err() {
            return Ok(ReviewOutcome::AlreadyReviewed);
        }
        listing.touch();

        Ok(ReviewOutcome::Appended(listing.clone()))
    }
}
