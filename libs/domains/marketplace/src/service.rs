//! Listing Service - Business logic layer
//!
//! Every mutation runs: not-found check, then ownership check, then schema
//! normalization, then the repository write.

use serde_json::Value;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::models::Listing;
use crate::ownership::{Actor, ensure_owner};
use crate::repository::{ListingRepository, ReviewOutcome};
use crate::reviews::{Review, ReviewInput};

pub struct ListingService<R: ListingRepository> {
    repository: Arc<R>,
}

impl<R: ListingRepository> Clone for ListingService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
        }
    }
}

impl<R: ListingRepository> ListingService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self) -> MarketplaceResult<Vec<R::Item>> {
        self.repository.list().await
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn list_mine(&self, actor: &Actor) -> MarketplaceResult<Vec<R::Item>> {
        self.repository.list_by_owner(&actor.id).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> MarketplaceResult<R::Item> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or_else(|| MarketplaceError::not_found(<R::Item as Listing>::KIND, id))
    }

    #[instrument(skip(self, actor, body), fields(user_id = %actor.id))]
    pub async fn create(&self, actor: &Actor, body: Value) -> MarketplaceResult<R::Item> {
        let fields = <R::Item as Listing>::SCHEMA.normalize_create(&body, actor)?;
        let listing = <R::Item as Listing>::from_fields(actor, fields)?;

        self.repository.insert(listing).await
    }

    #[instrument(skip(self, actor, body), fields(user_id = %actor.id))]
    pub async fn update(&self, actor: &Actor, id: Uuid, body: Value) -> MarketplaceResult<R::Item> {
        let listing = self.get(id).await?;
        ensure_owner(&listing, actor)?;

        let changes = <R::Item as Listing>::SCHEMA.normalize_update(&body)?;
        let updated = self
            .repository
            .update_fields(id, changes)
            .await?
            .ok_or_else(|| MarketplaceError::not_found(<R::Item as Listing>::KIND, id))?;

        tracing::info!(listing_id = %id, "Listing updated");
        Ok(updated)
    }

    #[instrument(skip(self, actor), fields(user_id = %actor.id))]
    pub async fn delete(&self, actor: &Actor, id: Uuid) -> MarketplaceResult<()> {
        let listing = self.get(id).await?;
        ensure_owner(&listing, actor)?;

        if !self.repository.delete(id).await? {
            return Err(MarketplaceError::not_found(<R::Item as Listing>::KIND, id));
        }
        Ok(())
    }

    /// Returns the listing with its recomputed aggregate.
    #[instrument(skip(self, actor, input), fields(user_id = %actor.id, rating = input.rating))]
    pub async fn add_review(
        &self,
        actor: &Actor,
        id: Uuid,
        input: ReviewInput,
    ) -> MarketplaceResult<R::Item> {
        input
            .validate()
            .map_err(|e| MarketplaceError::Validation(e.to_string()))?;

        match self
            .repository
            .append_review(id, Review::new(actor, input))
            .await?
        {
            ReviewOutcome::Appended(listing) => {
                tracing::info!(
                    listing_id = %id,
                    num_reviews = listing.reviews().num_reviews,
                    rating = listing.reviews().rating,
                    "Review added"
                );
                Ok(listing)
            }
            ReviewOutcome::AlreadyReviewed => Err(MarketplaceError::DuplicateReview),
            ReviewOutcome::Missing => Err(MarketplaceError::not_found(<R::Item as Listing>::KIND, id)),
        }
    }
}
