mod config;
mod handlers;
mod models;
mod statics;
mod telemetry;

use std::sync::Arc;

use axum::{routing::post, Router};
use gatehouse_yard::YardClient;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use telemetry::Telemetry;

pub struct AppState {
    pub yard: YardClient,
    pub telemetry: Telemetry,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    if config.upstream.accept_invalid_certs {
        tracing::warn!("upstream TLS certificate verification is DISABLED");
    }

    let yard = YardClient::new(config.upstream.clone())?;
    let telemetry = Telemetry::new(config.webhook_url.clone())?;
    let port = config.port;

    let state = Arc::new(AppState {
        yard,
        telemetry,
        config,
    });

    let app = Router::new()
        .route("/api/app_opened", post(handlers::app_opened))
        .route("/api/ha-track", post(handlers::track_event))
        .route("/api/auth", post(handlers::auth))
        .route("/api/scheduled", post(handlers::scheduled))
        .route("/api/search", post(handlers::search))
        .route("/api/condition_codes", post(handlers::condition_codes))
        .route("/api/checkin", post(handlers::check_in))
        .route("/api/upload_signature", post(handlers::upload_signature))
        .fallback(statics::serve_shell)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;
    tracing::info!("Gatehouse running on http://0.0.0.0:{port}");

    axum::serve(listener, app).await?;

    Ok(())
}
