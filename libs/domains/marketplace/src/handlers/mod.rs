//! HTTP handlers, one router per listing category.
//!
//! Each category module invokes `listing_handlers!` to get its annotated
//! endpoints, `ApiDoc` and `router`; the endpoints delegate to the generic
//! handlers below.

/// Generates the annotated endpoints, `ApiDoc` and `router` for one listing
/// category. Operation names are passed in so OpenAPI ids stay unique once
/// the categories are nested into one document.
macro_rules! listing_handlers {
    (
        listing: $listing:ident,
        tag: $tag:tt,
        about: $about:tt,
        fields: $fields:tt,
        removed: $removed:tt,
        operations: [
            $list:ident,
            $list_mine:ident,
            $create:ident,
            $get:ident,
            $update:ident,
            $delete:ident,
            $review:ident $(,)?
        ] $(,)?
    ) => {
        use axum::{
            Json, Router,
            extract::{State, rejection::JsonRejection},
            http::StatusCode,
            middleware,
            routing::{get, post},
        };
        use axum_helpers::{
            AuthUser, JwtAuth, UuidPath, ValidatedJson,
            errors::responses::{
                BadRequestUuidResponse, BadRequestValidationResponse, ConflictResponse,
                ForbiddenResponse, InternalServerErrorResponse, NotFoundResponse,
                UnauthorizedResponse,
            },
            optional_jwt_auth_middleware,
        };
        use serde_json::Value;
        use std::sync::Arc;
        use utoipa::OpenApi;

        use $crate::error::MarketplaceResult;
        use $crate::models::{$listing, MessageResponse};
        use $crate::repository::ListingRepository;
        use $crate::reviews::{Review, ReviewInput};
        use $crate::service::ListingService;

        #[derive(OpenApi)]
        #[openapi(
            paths($list, $list_mine, $create, $get, $update, $delete, $review),
            components(
                schemas($listing, Review, ReviewInput, MessageResponse),
                responses(
                    NotFoundResponse,
                    BadRequestValidationResponse,
                    BadRequestUuidResponse,
                    UnauthorizedResponse,
                    ForbiddenResponse,
                    ConflictResponse,
                    InternalServerErrorResponse
                )
            ),
            tags((name = $tag, description = $about))
        )]
        pub struct ApiDoc;

        /// Create the category router. `auth` verifies bearer tokens for the
        /// protected routes.
        pub fn router<R>(service: ListingService<R>, auth: JwtAuth) -> Router
        where
            R: ListingRepository<Item = $listing> + 'static,
        {
            Router::new()
                .route("/", get($list).post($create))
                .route("/mine", get($list_mine))
                .route("/{id}", get($get).put($update).delete($delete))
                .route("/{id}/reviews", post($review))
                .layer(middleware::from_fn_with_state(
                    auth,
                    optional_jwt_auth_middleware,
                ))
                .with_state(Arc::new(service))
        }

        /// List all listings, newest first
        #[utoipa::path(
            get,
            path = "",
            tag = $tag,
            responses(
                (status = 200, description = "Listings, newest first", body = Vec<$listing>),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $list<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
        ) -> MarketplaceResult<Json<Vec<$listing>>> {
            super::list(state).await
        }

        /// List the caller's own listings
        #[utoipa::path(
            get,
            path = "/mine",
            tag = $tag,
            responses(
                (status = 200, description = "Listings owned by the caller", body = Vec<$listing>),
                (status = 401, response = UnauthorizedResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $list_mine<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            user: AuthUser,
        ) -> MarketplaceResult<Json<Vec<$listing>>> {
            super::list_mine(state, user).await
        }

        /// Create a listing owned by the caller
        ///
        /// Numeric strings are accepted for numeric fields.
        #[utoipa::path(
            post,
            path = "",
            tag = $tag,
            request_body(content = Value, description = $fields),
            responses(
                (status = 201, description = "Listing created", body = $listing),
                (status = 400, response = BadRequestValidationResponse),
                (status = 401, response = UnauthorizedResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $create<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            user: AuthUser,
            payload: Result<Json<Value>, JsonRejection>,
        ) -> MarketplaceResult<(StatusCode, Json<$listing>)> {
            super::create(state, user, payload).await
        }

        /// Get a listing by ID
        #[utoipa::path(
            get,
            path = "/{id}",
            tag = $tag,
            params(("id" = Uuid, Path, description = "Listing ID")),
            responses(
                (status = 200, description = "Listing found", body = $listing),
                (status = 400, response = BadRequestUuidResponse),
                (status = 404, response = NotFoundResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $get<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            UuidPath(id): UuidPath,
        ) -> MarketplaceResult<Json<$listing>> {
            super::get(state, id).await
        }

        /// Update a listing. Only the owner may update; absent fields are kept.
        #[utoipa::path(
            put,
            path = "/{id}",
            tag = $tag,
            params(("id" = Uuid, Path, description = "Listing ID")),
            request_body(content = Value, description = "Fields to change"),
            responses(
                (status = 200, description = "Listing updated", body = $listing),
                (status = 400, response = BadRequestValidationResponse),
                (status = 401, response = UnauthorizedResponse),
                (status = 403, response = ForbiddenResponse),
                (status = 404, response = NotFoundResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $update<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            user: AuthUser,
            UuidPath(id): UuidPath,
            payload: Result<Json<Value>, JsonRejection>,
        ) -> MarketplaceResult<Json<$listing>> {
            super::update(state, user, id, payload).await
        }

        /// Delete a listing. Only the owner may delete.
        #[utoipa::path(
            delete,
            path = "/{id}",
            tag = $tag,
            params(("id" = Uuid, Path, description = "Listing ID")),
            responses(
                (status = 200, description = "Listing deleted", body = MessageResponse),
                (status = 400, response = BadRequestUuidResponse),
                (status = 401, response = UnauthorizedResponse),
                (status = 403, response = ForbiddenResponse),
                (status = 404, response = NotFoundResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $delete<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            user: AuthUser,
            UuidPath(id): UuidPath,
        ) -> MarketplaceResult<Json<MessageResponse>> {
            super::delete(state, user, id, $removed).await
        }

        /// Review a listing. One review per user.
        #[utoipa::path(
            post,
            path = "/{id}/reviews",
            tag = $tag,
            params(("id" = Uuid, Path, description = "Listing ID")),
            request_body = ReviewInput,
            responses(
                (status = 201, description = "Review added", body = MessageResponse),
                (status = 400, response = BadRequestValidationResponse),
                (status = 401, response = UnauthorizedResponse),
                (status = 404, response = NotFoundResponse),
                (status = 409, response = ConflictResponse),
                (status = 500, response = InternalServerErrorResponse)
            )
        )]
        async fn $review<R: ListingRepository<Item = $listing>>(
            state: State<Arc<ListingService<R>>>,
            user: AuthUser,
            UuidPath(id): UuidPath,
            ValidatedJson(input): ValidatedJson<ReviewInput>,
        ) -> MarketplaceResult<(StatusCode, Json<MessageResponse>)> {
            super::add_review(state, user, id, input).await
        }
    };
}

pub mod consumer;
pub mod lend_machine;
pub mod seed;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
};
use axum_helpers::AuthUser;
use serde_json::Value;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::MarketplaceResult;
use crate::models::MessageResponse;
use crate::ownership::Actor;
use crate::repository::ListingRepository;
use crate::reviews::ReviewInput;
use crate::service::ListingService;

type ServiceState<R> = State<Arc<ListingService<R>>>;

async fn list<R: ListingRepository>(
    State(service): ServiceState<R>,
) -> MarketplaceResult<Json<Vec<R::Item>>> {
    Ok(Json(service.list().await?))
}

async fn list_mine<R: ListingRepository>(
    State(service): ServiceState<R>,
    user: AuthUser,
) -> MarketplaceResult<Json<Vec<R::Item>>> {
    Ok(Json(service.list_mine(&Actor::from(user)).await?))
}

async fn get<R: ListingRepository>(
    State(service): ServiceState<R>,
    id: Uuid,
) -> MarketplaceResult<Json<R::Item>> {
    Ok(Json(service.get(id).await?))
}

async fn create<R: ListingRepository>(
    State(service): ServiceState<R>,
    user: AuthUser,
    payload: Result<Json<Value>, JsonRejection>,
) -> MarketplaceResult<(StatusCode, Json<R::Item>)> {
    let Json(body) = payload?;
    let listing = service.create(&Actor::from(user), body).await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

async fn update<R: ListingRepository>(
    State(service): ServiceState<R>,
    user: AuthUser,
    id: Uuid,
    payload: Result<Json<Value>, JsonRejection>,
) -> MarketplaceResult<Json<R::Item>> {
    let Json(body) = payload?;
    Ok(Json(service.update(&Actor::from(user), id, body).await?))
}

async fn delete<R: ListingRepository>(
    State(service): ServiceState<R>,
    user: AuthUser,
    id: Uuid,
    message: &'static str,
) -> MarketplaceResult<Json<MessageResponse>> {
    service.delete(&Actor::from(user), id).await?;
    Ok(Json(MessageResponse::new(message)))
}

async fn add_review<R: ListingRepository>(
    State(service): ServiceState<R>,
    user: AuthUser,
    id: Uuid,
    input: ReviewInput,
) -> MarketplaceResult<(StatusCode, Json<MessageResponse>)> {
    service.add_review(&Actor::from(user), id, input).await?;
    Ok((StatusCode::CREATED, Json(MessageResponse::new("Review added"))))
}
