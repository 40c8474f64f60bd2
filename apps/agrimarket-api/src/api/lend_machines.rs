//! Lend machines API routes
//!
//! Mounted at `/api/lend-machines`.

use axum::Router;
use domain_marketplace::{LendMachine, handlers};

use super::with_backend;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router {
    let auth = state.jwt.clone();
    with_backend::<LendMachine, _, _>(
        state,
        |service| handlers::lend_machine::router(service, auth.clone()),
        |service| handlers::lend_machine::router(service, auth.clone()),
    )
}
