use super::shutdown::{ShutdownCoordinator, shutdown_signal};
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::{Environment, server::ServerConfig};
use std::io;
use std::time::Duration;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;

/// Serve `router` until SIGINT/SIGTERM, without cleanup coordination.
pub async fn create_app(router: Router, server_config: &ServerConfig) -> io::Result<()> {
    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;

    info!("Server starting on {}", listener.local_addr()?);
    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e))
}

/// Wrap the domain routers with docs and the shared middleware stack.
///
/// - `apis` is nested under `/api` and must already have its state applied
/// - OpenAPI JSON at `/api-docs/openapi.json`, UIs at `/swagger-ui`, `/redoc`,
///   `/rapidoc` and `/scalar`
/// - unknown paths fall back to a JSON 404
/// - request spans, security headers, CORS (see [`cors_layer_from_env`]) and
///   response compression
pub async fn create_router<T>(apis: Router, environment: Environment) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors_layer = cors_layer_from_env(environment)?;

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors_layer)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` with coordinated shutdown.
///
/// On SIGINT/SIGTERM the server stops accepting connections, drains in-flight
/// requests, then runs `cleanup` bounded by `shutdown_timeout`.
pub async fn create_production_app<F>(
    router: Router,
    server_config: &ServerConfig,
    shutdown_timeout: Duration,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let mut shutdown_rx = coordinator.subscribe();

    let listener = tokio::net::TcpListener::bind(server_config.address()).await?;
    info!("Server starting on {}", listener.local_addr()?);

    let signal_coordinator = coordinator.clone();
    tokio::spawn(async move { signal_coordinator.wait_for_signal().await });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
        .inspect_err(|e| tracing::error!("Server encountered an error: {:?}", e));

    info!("Running cleanup (timeout: {:?})", shutdown_timeout);
    match tokio::time::timeout(shutdown_timeout, cleanup).await {
        Ok(()) => info!("Cleanup completed"),
        Err(_) => tracing::warn!("Cleanup exceeded {:?}, forcing shutdown", shutdown_timeout),
    }

    serve_result
}
