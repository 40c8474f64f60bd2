//! Stateless JWT authentication.
//!
//! Tokens are issued by the account service and verified here with the shared
//! HS256 secret. [`optional_jwt_auth_middleware`] attaches [`JwtClaims`] to the
//! request when a valid token is present; handlers that need a caller take an
//! [`AuthUser`] argument, which rejects with 401 otherwise.
//!
//! ```ignore
//! let auth = JwtAuth::new(&JwtConfig::from_env()?);
//!
//! let routes = Router::new()
//!     .route("/listings", get(list).post(create))
//!     .layer(axum::middleware::from_fn_with_state(auth, optional_jwt_auth_middleware));
//!
//! async fn create(user: AuthUser, Json(body): Json<Value>) -> impl IntoResponse { /* ... */ }
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;
pub mod user;

pub use config::JwtConfig;
pub use jwt::{ACCESS_TOKEN_TTL, JwtAuth, JwtClaims};
pub use middleware::optional_jwt_auth_middleware;
pub use user::AuthUser;
