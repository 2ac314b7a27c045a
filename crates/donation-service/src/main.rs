//! Stripe Donation API - HTTP service issuing donation invoices
//!
//! This is the main entry point for the standalone listener.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use donation_service::{create_router, AppState, ServiceConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,donation_service=debug,donation_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Stripe Donation API");

    // Load configuration from environment
    let config = ServiceConfig::from_env()?;

    tracing::info!(
        listen_addr = %config.listen_addr(),
        cors_origins = ?config.cors_origins,
        "Service configuration loaded"
    );

    let state = AppState::with_stripe(config.clone())?;
    let app = create_router(state);

    tracing::info!(listen_addr = %config.listen_addr(), "Starting HTTP server");
    let listener = tokio::net::TcpListener::bind(config.listen_addr()).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
