//! # Axum Helpers
//!
//! Shared HTTP plumbing for the marketplace services.
//!
//! - **[`auth`]**: JWT verification, optional auth middleware, [`AuthUser`] extractor
//! - **[`server`]**: router assembly with OpenAPI UIs, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: [`AppError`] and the JSON error body with stable [`ErrorCode`]s
//! - **[`extractors`]**: UUID path and validated JSON extractors
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, environment).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &server_config, Duration::from_secs(30), async {}).await?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use auth::{ACCESS_TOKEN_TTL, AuthUser, JwtAuth, JwtClaims, JwtConfig, optional_jwt_auth_middleware};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_app, create_production_app,
    create_router, health_router, run_health_checks, shutdown_signal,
};

pub use http::{cors_layer_from_env, create_cors_layer, security_headers};

pub use errors::{AppError, ErrorCode, ErrorResponse, set_expose_error_traces};

pub use extractors::{UuidPath, ValidatedJson};
