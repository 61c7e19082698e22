use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use pathway_core::CoreConfig;

/// Main entry point for the pathway application
///
/// Resolves configuration once, installs tracing and serves the REST API with Swagger UI.
///
/// # Environment Variables
/// - `PATHWAY_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATHWAY_DEFAULT_LOCALE`: locale used when a request names none (default: "de")
/// - `PATHWAY_LOCALE_DIR`: directory of `<locale>.yaml` overrides (optional)
/// - `PATHWAY_REFERRAL_SEED`: YAML file seeding the referral store (optional)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - configuration, locale tables or the referral seed fail to load,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("pathway=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = CoreConfig::from_env()?;
    let state = AppState::from_config(&cfg)?;

    tracing::info!("++ Starting pathway REST on {}", cfg.rest_addr());

    let listener = tokio::net::TcpListener::bind(cfg.rest_addr()).await?;
    axum::serve(listener, router(state)).await?;

    Ok(())
}
