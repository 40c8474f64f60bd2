//! MongoDB implementation of ListingRepository

use async_trait::async_trait;
use chrono::Utc;
use futures_util::TryStreamExt;
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, to_bson, to_document},
    options::{FindOptions, IndexOptions, ReturnDocument},
};
use serde_json::{Map, Value};
use tracing::instrument;
use uuid::Uuid;

use crate::error::{MarketplaceError, MarketplaceResult};
use crate::models::Listing;
use crate::repository::{ListingRepository, ReviewOutcome};
use crate::reviews::Review;

/// MongoDB repository, one collection per listing category.
pub struct MongoListingRepository<L: Listing> {
    collection: Collection<L>,
}

impl<L: Listing> MongoListingRepository<L> {
    /// Uses the category's default collection
    pub fn new(db: &Database) -> Self {
        Self::with_collection(db, L::KIND.collection())
    }

    pub fn with_collection(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection::<L>(collection_name),
        }
    }

    pub async fn init_indexes(&self) -> MarketplaceResult<()> {
        let indexes = vec![
            // "mine" listings
            IndexModel::builder()
                .keys(doc! { "user": 1, "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_owner_created".to_string())
                        .build(),
                )
                .build(),
            IndexModel::builder()
                .keys(doc! { "created_at": -1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_created".to_string())
                        .build(),
                )
                .build(),
            // Duplicate-review filter
            IndexModel::builder()
                .keys(doc! { "reviews.user": 1 })
                .options(
                    IndexOptions::builder()
                        .name("idx_reviewer".to_string())
                        .build(),
                )
                .build(),
        ];

        self.collection.create_indexes(indexes).await?;
        tracing::info!(
            collection = self.collection.name(),
            "Listing indexes created successfully"
        );
        Ok(())
    }

    pub fn collection(&self) -> &Collection<L> {
        &self.collection
    }

    /// Matches the hyphenated string the listing's `_id` is stored as.
    fn id_filter(id: Uuid) -> Document {
        doc! { "_id": id.as_hyphenated().to_string() }
    }

    async fn find_sorted(&self, filter: Document) -> MarketplaceResult<Vec<L>> {
        let options = FindOptions::builder()
            .sort(doc! { "created_at": -1 })
            .build();

        let cursor = self.collection.find(filter).with_options(options).await?;
        Ok(cursor.try_collect().await?)
    }

    /// `$set` of the changed fields plus `updated_at`. Review fields are never
    /// part of `changes`, so a concurrent append survives.
    fn update_document(changes: Map<String, Value>) -> MarketplaceResult<Document> {
        let mut set = to_document(&changes)
            .map_err(|e| MarketplaceError::Internal(format!("Failed to encode changes: {e}")))?;
        let now = to_bson(&Utc::now())
            .map_err(|e| MarketplaceError::Internal(format!("Failed to encode timestamp: {e}")))?;
        set.insert("updated_at", now);

        Ok(doc! { "$set": set })
    }

    /// Pipeline update that pushes `review` and recomputes the aggregate
    /// from the stored running sum and count.
    fn append_review_pipeline(review: &Review) -> MarketplaceResult<Vec<Document>> {
        let rating = review.rating;
        let entry = to_bson(review)
            .map_err(|e| MarketplaceError::Internal(format!("Failed to encode review: {e}")))?;
        let now = to_bson(&Utc::now())
            .map_err(|e| MarketplaceError::Internal(format!("Failed to encode timestamp: {e}")))?;

        Ok(vec![
            doc! {
                "$set": {
                    "reviews": {
                        "$concatArrays": [
                            { "$ifNull": ["$reviews", []] },
                            [{ "$literal": entry }]
                        ]
                    },
                    "num_reviews": { "$add": [{ "$ifNull": ["$num_reviews", 0] }, 1] },
                    "rating_sum": { "$add": [{ "$ifNull": ["$rating_sum", 0] }, rating] },
                    "updated_at": now,
                }
            },
            doc! {
                "$set": {
                    "rating": { "$divide": ["$rating_sum", "$num_reviews"] }
                }
            },
        ])
    }
}

#[async_trait]
impl<L: Listing> ListingRepository for MongoListingRepository<L> {
    type Item = L;

    #[instrument(skip(self, listing), fields(listing_id = %listing.id()))]
    async fn insert(&self, listing: L) -> MarketplaceResult<L> {
        self.collection.insert_one(&listing).await?;

        tracing::info!(kind = %L::KIND, "Listing created successfully");
        Ok(listing)
    }

    #[instrument(skip(self))]
    async fn get_by_id(&self, id: Uuid) -> MarketplaceResult<Option<L>> {
        Ok(self.collection.find_one(Self::id_filter(id)).await?)
    }

    #[instrument(skip(self))]
    async fn list(&self) -> MarketplaceResult<Vec<L>> {
        self.find_sorted(doc! {}).await
    }

    #[instrument(skip(self))]
    async fn list_by_owner(&self, owner: &str) -> MarketplaceResult<Vec<L>> {
        self.find_sorted(doc! { "user": owner }).await
    }

    #[instrument(skip(self, changes), fields(fields = changes.len()))]
    async fn update_fields(
        &self,
        id: Uuid,
        changes: Map<String, Value>,
    ) -> MarketplaceResult<Option<L>> {
        Ok(self
            .collection
            .find_one_and_update(Self::id_filter(id), Self::update_document(changes)?)
            .return_document(ReturnDocument::After)
            .await?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> MarketplaceResult<bool> {
        let result = self.collection.delete_one(Self::id_filter(id)).await?;

        if result.deleted_count > 0 {
            tracing::info!(listing_id = %id, "Listing deleted successfully");
        }
        Ok(result.deleted_count > 0)
    }

    #[instrument(skip(self, review), fields(user_id = %review.user))]
    async fn append_review(&self, id: Uuid, review: Review) -> MarketplaceResult<ReviewOutcome<L>> {
        let mut filter = Self::id_filter(id);
        filter.insert("reviews.user", doc! { "$ne": review.user.as_str() });

        let updated = self
            .collection
            .find_one_and_update(filter, Self::append_review_pipeline(&review)?)
            .return_document(ReturnDocument::After)
            .await?;

        if let Some(listing) = updated {
            return Ok(ReviewOutcome::Appended(listing));
        }

        // The filter missed: either no such listing or the reviewer is already on it.
        match self.collection.find_one(Self::id_filter(id)).await? {
            Some(_) => Ok(ReviewOutcome::AlreadyReviewed),
            None => Ok(ReviewOutcome::Missing),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SeedProduct;
    use crate::ownership::Actor;
    use crate::reviews::ReviewInput;
    use mongodb::bson::{Bson, from_slice, to_raw_document_buf};
    use serde_json::json;

    type SeedRepo = MongoListingRepository<SeedProduct>;

    fn seed() -> SeedProduct {
        let owner = Actor::new("o", "Owner");
        let body = json!({
            "name": "Teff",
            "description": "Quncho",
            "category": "Cereal",
            "price": 6,
            "count_in_stock": 9
        });
        let fields = SeedProduct::SCHEMA.normalize_create(&body, &owner).unwrap();
        SeedProduct::from_fields(&owner, fields).unwrap()
    }

    /// Encodes the way the driver does on insert
    fn stored(listing: &SeedProduct) -> Document {
        let raw = to_raw_document_buf(listing).unwrap();
        from_slice(raw.as_bytes()).unwrap()
    }

    #[test]
    fn test_id_filter_matches_stored_id() {
        let listing = seed();
        let document = stored(&listing);

        assert_eq!(document.get("_id"), SeedRepo::id_filter(listing.id).get("_id"));
        assert_eq!(
            document.get("_id"),
            Some(&Bson::String(listing.id.to_string()))
        );
    }

    #[test]
    fn test_stored_document_decodes() {
        let listing = seed();
        let raw = to_raw_document_buf(&listing).unwrap();

        let back: SeedProduct = from_slice(raw.as_bytes()).unwrap();
        assert_eq!(back.id, listing.id);
        assert_eq!(back.reviews, listing.reviews);
        assert_eq!(back.count_in_stock, 9);
    }

    #[test]
    fn test_update_document_sets_only_changes() {
        let changes = SeedProduct::SCHEMA
            .normalize_update(&json!({ "price": "7.5", "countInStock": 2 }))
            .unwrap();
        let update = SeedRepo::update_document(changes).unwrap();

        let set = update.get_document("$set").unwrap();
        let mut keys: Vec<_> = set.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["count_in_stock", "price", "updated_at"]);
        assert_eq!(set.get_f64("price").unwrap(), 7.5);
        assert_eq!(set.get_i64("count_in_stock").unwrap(), 2);
    }

    #[test]
    fn test_append_review_pipeline_shape() {
        let review = Review::new(
            &Actor::new("buyer", "Bayo"),
            ReviewInput {
                rating: 4,
                comment: "ok".into(),
            },
        );
        let pipeline = SeedRepo::append_review_pipeline(&review).unwrap();
        assert_eq!(pipeline.len(), 2);

        let first = pipeline[0].get_document("$set").unwrap();
        for key in ["reviews", "num_reviews", "rating_sum", "updated_at"] {
            assert!(first.contains_key(key), "missing {key}");
        }
        assert_eq!(
            first.get_document("rating_sum").unwrap(),
            &doc! { "$add": [{ "$ifNull": ["$rating_sum", 0] }, 4] }
        );

        // The average is computed from the updated sum and count
        let second = pipeline[1].get_document("$set").unwrap();
        assert_eq!(
            second.get_document("rating").unwrap(),
            &doc! { "$divide": ["$rating_sum", "$num_reviews"] }
        );
        assert!(!second.contains_key("reviews"));
    }
}
