//! Marketplace Domain
//!
//! Listings for the three marketplace categories (consumer products, lend
//! machines and seed products), their reviews, and the ownership rules around
//! them. One generic stack serves all three categories.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← HTTP endpoints, one router per category
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Ownership guard, schema normalization, review outcomes
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Data access (trait + MongoDB and in-memory implementations)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Listings, field schemas, review log
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use axum_helpers::{JwtAuth, JwtConfig};
//! use domain_marketplace::{
//!     handlers, mongodb::MongoListingRepository, service::ListingService, SeedProduct,
//! };
//! use mongodb::Client;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::with_uri_str("mongodb://localhost:27017").await?;
//! let db = client.database("agrimarket");
//!
//! let repository = MongoListingRepository::<SeedProduct>::new(&db);
//! repository.init_indexes().await?;
//!
//! let auth = JwtAuth::new(&JwtConfig::new("a-secret-of-at-least-thirty-two-bytes"));
//! let router = handlers::seed::router(ListingService::new(repository), auth);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;
pub mod memory;
pub mod models;
pub mod mongodb;
pub mod ownership;
pub mod repository;
pub mod reviews;
pub mod schema;
pub mod service;

pub use error::{MarketplaceError, MarketplaceResult};
pub use handlers::consumer::ApiDoc as ConsumerApiDoc;
pub use handlers::lend_machine::ApiDoc as LendMachineApiDoc;
pub use handlers::seed::ApiDoc as SeedApiDoc;
pub use memory::InMemoryListingRepository;
pub use self::mongodb::MongoListingRepository;
pub use models::{ConsumerProduct, LendMachine, Listing, ListingKind, MessageResponse, SeedProduct};
pub use ownership::{Actor, ensure_owner};
pub use repository::{ListingRepository, ReviewOutcome};
pub use reviews::{Review, ReviewInput, ReviewLog};
pub use schema::{FieldDefault, FieldKind, FieldSpec, ListingSchema};
pub use service::ListingService;
