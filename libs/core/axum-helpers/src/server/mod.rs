//! Router assembly, health endpoints and graceful shutdown.
//!
//! ```ignore
//! let router = create_router::<ApiDoc>(api_routes, environment).await?;
//! let app = router.merge(health_router(app_info!()));
//! create_production_app(app, &server_config, Duration::from_secs(30), cleanup).await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_app, create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
