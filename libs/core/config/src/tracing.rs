use crate::Environment;
use tracing::{debug, info};
use tracing_subscriber::{prelude::*, EnvFilter};

/// Default filter for development builds: verbose for our crates, quiet for the driver.
const DEV_FILTER: &str = "debug,tower_http=debug,mongodb=info,hyper=info";

/// Default filter for production builds.
const PROD_FILTER: &str = "info,tower_http=info,mongodb=warn";

/// Install color-eyre with the project-standard hook.
///
/// Call early in `main()` so startup failures render with locations. Safe to call
/// more than once.
pub fn install_color_eyre() {
    let _ = color_eyre::config::HookBuilder::default()
        .display_location_section(true)
        .display_env_section(false)
        .install();
}

/// Initialize the global tracing subscriber for the given environment.
///
/// - **Production** (`APP_ENV=production`): flattened JSON events without targets,
///   ready for log shipping.
/// - **Development**: pretty, multi-line events.
///
/// Both variants carry a [`tracing_error::ErrorLayer`] so `eyre` reports include
/// span traces. `RUST_LOG` overrides the default filter.
///
/// Calling this twice is harmless; the second call logs at debug and returns.
///
/// ```ignore
/// use core_config::{Environment, tracing::{init_tracing, install_color_eyre}};
///
/// install_color_eyre();
/// init_tracing(&Environment::from_env());
/// ```
pub fn init_tracing(environment: &Environment) {
    let is_production = environment.is_production();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if is_production {
            EnvFilter::new(PROD_FILTER)
        } else {
            EnvFilter::new(DEV_FILTER)
        }
    });

    let result = if is_production {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(false)
                    .flatten_event(true),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_file(false)
                    .with_line_number(false)
                    .pretty(),
            )
            .with(tracing_error::ErrorLayer::default())
            .with(filter)
            .try_init()
    };

    match result {
        Ok(_) => info!(?environment, "Tracing initialized"),
        // Already installed (tests, or a second call from main)
        Err(_) => debug!("Tracing already initialized, skipping re-initialization"),
    }
}
