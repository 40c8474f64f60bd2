//! Consumer products API routes
//!
//! Mounted at `/api/consumer-products`.

use axum::Router;
use domain_marketplace::{ConsumerProduct, handlers};

use super::with_backend;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let auth = state.jwt.clone();
    with_backend::<ConsumerProduct, _, _>(
        state,
        |service| handlers::consumer::router(service, auth.clone()),
        |service| handlers::consumer::router(service, auth.clone()),
    )
}
