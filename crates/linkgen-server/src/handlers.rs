//! HTTP Handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use linkgen_notify::{acknowledgment_message, internal_notification, LeadSubmission};
use linkgen_payments::generate_payment_link;

use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub llm_connected: bool,
}

#[derive(Debug, Deserialize)]
pub struct PaymentRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentLinkResponse {
    pub success: bool,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct IdeaResponse {
    pub success: bool,
    pub message: String,
    pub message_sid: String,
}

/// Error body shape: `{"detail": "..."}`
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub detail: String,
}

type ApiError = (StatusCode, Json<ErrorDetail>);

fn internal_error(detail: impl Into<String>) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorDetail {
            detail: detail.into(),
        }),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let llm_connected = state.provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        llm_connected,
    })
}

/// Generate a payment link from a free-text request.
///
/// Drives the planner through create_product → create_price →
/// create_payment_link and returns the resulting URL. Every successful run
/// creates three new billable entities at the provider; failures leave any
/// already-created entities in place.
pub async fn generate_payment_link_handler(
    State(state): State<AppState>,
    Json(payload): Json<PaymentRequest>,
) -> Result<Json<PaymentLinkResponse>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err((
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(ErrorDetail {
                detail: "message must be a non-empty string".into(),
            }),
        ));
    }

    tracing::info!(message = %payload.message, "Starting payment link generation");

    let link = generate_payment_link(
        state.provider.clone(),
        state.payments.clone(),
        &state.model,
        &payload.message,
    )
    .await
    .map_err(|e| {
        tracing::error!("Error generating payment link: {}", e);
        internal_error(e.to_string())
    })?;

    Ok(Json(PaymentLinkResponse {
        success: true,
        link,
    }))
}

/// Accept a lead submission and notify the team by SMS.
///
/// Sends one message to the fixed admin number and returns the
/// acknowledgment text together with the provider message SID.
pub async fn analyze_idea_handler(
    State(state): State<AppState>,
    Json(submission): Json<LeadSubmission>,
) -> Result<Json<IdeaResponse>, ApiError> {
    let response_message = acknowledgment_message(&submission);
    let notification = internal_notification(&submission);

    let receipt = state
        .sms
        .send_sms(&state.notify.to, &state.notify.from, &notification)
        .await
        .map_err(|e| {
            tracing::error!(company = %submission.company, "Error sending lead notification: {}", e);
            internal_error(e.to_string())
        })?;

    Ok(Json(IdeaResponse {
        success: true,
        message: response_message,
        message_sid: receipt.sid,
    }))
}
