//! API routes module
//!
//! One nested router per listing category plus the readiness probe.

pub mod consumer_products;
pub mod health;
pub mod lend_machines;
pub mod seed_products;

use axum::Router;
use domain_marketplace::{
    ConsumerProduct, InMemoryListingRepository, LendMachine, Listing, ListingKind, ListingService,
    MongoListingRepository, SeedProduct,
};

use crate::state::AppState;

/// Create all API routes
/// Note: These are nested under /api by axum_helpers::create_router
pub fn routes(state: &AppState) -> Router {
    Router::new()
        .nest(
            &path(ListingKind::Consumer),
            consumer_products::router(state),
        )
        .nest(&path(ListingKind::LendMachine), lend_machines::router(state))
        .nest(&path(ListingKind::Seed), seed_products::router(state))
        .merge(health::router(state.clone()))
}

/// Create indexes for every category collection.
pub async fn init_indexes(db: &mongodb::Database) -> eyre::Result<()> {
    MongoListingRepository::<ConsumerProduct>::new(db)
        .init_indexes()
        .await?;
    MongoListingRepository::<LendMachine>::new(db)
        .init_indexes()
        .await?;
    MongoListingRepository::<SeedProduct>::new(db)
        .init_indexes()
        .await?;
    Ok(())
}

fn path(kind: ListingKind) -> String {
    format!("/{kind}")
}

/// Build a category router on whichever backend the state selects.
fn with_backend<L, F, G>(state: &AppState, mongo_router: F, memory_router: G) -> Router
where
    L: Listing,
    F: FnOnce(ListingService<MongoListingRepository<L>>) -> Router,
    G: FnOnce(ListingService<InMemoryListingRepository<L>>) -> Router,
{
    match &state.mongo {
        Some(mongo) => mongo_router(ListingService::new(MongoListingRepository::new(&mongo.db))),
        None => memory_router(ListingService::new(InMemoryListingRepository::new())),
    }
}
