//! Seed products API routes
//!
//! Mounted at `/api/seed-products`.

use axum::Router;
use domain_marketplace::{SeedProduct, handlers};

use super::with_backend;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let auth = state.jwt.clone();
    with_backend::<SeedProduct, _, _>(
        state,
        |service| handlers::seed::router(service, auth.clone()),
        |service| handlers::seed::router(service, auth.clone()),
    )
}
