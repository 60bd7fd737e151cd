use anyhow::Context;
use kaas_api::{
    app,
    services::build_kubernetes::Kubernetes,
    utilities::{app_state::AppState, config::Config},
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = Config::init()
        .await
        .context("Failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.tracing_level.as_str())),
        )
        .init();

    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    info!("Starting kaas-api");
    info!("  Server: {}", config.server_address);
    info!("  Kubernetes namespace: {}", config.k8s_namespace);
    info!("  Ingress enabled: {}", config.ingress_enabled);

    let kubernetes = Kubernetes::new(&config)
        .await
        .context("Failed to initialize Kubernetes client")?;
    info!("Kubernetes client initialized");

    let listener = tokio::net::TcpListener::bind(&config.server_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.server_address))?;
    info!("Listening on {}", listener.local_addr()?);

    let state = AppState { kubernetes, config };
    axum::serve(listener, app(state)).await?;

    Ok(())
}
