mod config;
mod error;
mod routes;

use config::ApiConfig;
use routes::{app_router, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(debug_assertions)]
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("flightcard=info".parse().expect("valid directive"))
                .add_directive("tower_http=info".parse().expect("valid directive")),
        )
        .init();

    let config = ApiConfig::from_env()?;
    tracing::info!("Starting flightcard-api with config: {:?}", config);

    let resolver = flightcard_core::build_resolver(&config.core)?;
    let router = app_router(AppState::new(resolver));

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!("flightcard-api listening on {}", config.bind_addr);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutting down");
}
