//! linkgen HTTP Server
//!
//! Axum-based server exposing two endpoints: payment-link generation via
//! the LLM planner, and lead intake with SMS notification. All provider
//! clients are constructed here and injected into handlers through
//! `AppState`.

mod handlers;
mod state;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use linkgen_core::LlmProvider;
use linkgen_notify::TwilioGateway;
use linkgen_openai::OpenAiProvider;
use linkgen_payments::StripeGateway;

use crate::handlers::{analyze_idea_handler, generate_payment_link_handler, health_check};
use crate::state::{AppState, NotifyNumbers};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment
    dotenvy::dotenv().ok();

    // Provider clients fail here, at startup, when required variables are
    // missing rather than on the first request.
    let provider = Arc::new(OpenAiProvider::from_env()?);
    let payments = Arc::new(StripeGateway::from_env()?);
    let sms = Arc::new(TwilioGateway::from_env()?);
    let notify = NotifyNumbers::from_env()?;

    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ LLM provider reachable"),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ LLM provider not reachable - payment-link planner will fail");
        }
    }

    let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-3.5-turbo".into());
    tracing::info!(%model, "Planner model configured");

    let state = AppState {
        provider,
        payments,
        sms,
        notify,
        model,
    };

    // CORS: allow all origins, matching the original development posture
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health_check))
        .route("/generate-payment-link", post(generate_payment_link_handler))
        .route("/analyze-idea", post(analyze_idea_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("linkgen server running on http://{}", addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                 - Health check");
    tracing::info!("  POST /generate-payment-link  - Create a payment link from free text");
    tracing::info!("  POST /analyze-idea           - Submit a lead, notify by SMS");

    axum::serve(listener, app).await?;

    Ok(())
}
