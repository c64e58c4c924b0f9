// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! HTTP handlers for the intake service.
//!
//! The form-submission handler in front of this service extracts the
//! client identity and verifies the challenge token; this layer only
//! adapts its call into the intake pipeline.

use crate::filters::ChallengeOutcome;
use crate::intake::{IntakeService, SubmissionResponse};
use crate::metrics::IntakeMetrics;
use crate::schema::ApplicationPayload;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};

/// Shared application state.
pub struct AppState {
    pub intake: IntakeService,
    pub metrics: Arc<IntakeMetrics>,
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// One application submission as forwarded by the form handler.
#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    /// Rate-limit key, normally the originating IP. Absent collapses to
    /// a single shared quota.
    #[serde(default)]
    pub identity: Option<String>,

    /// Whether the caller verified the challenge token upstream.
    #[serde(default)]
    pub challenge_verified: bool,

    /// The raw form fields.
    #[serde(flatten)]
    pub application: ApplicationPayload,
}

/// Health check endpoint.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "membership-intake",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Process a membership application.
///
/// Always returns 200 with the uniform body: the UI reads the body, and
/// any status-level distinction for the honeypot branch would reveal the
/// classification the pipeline deliberately hides.
pub async fn apply(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SubmitRequest>,
) -> Json<SubmissionResponse> {
    debug!(
        identity = ?request.identity,
        challenge_verified = request.challenge_verified,
        "processing application submission"
    );

    let response = state
        .intake
        .submit(
            &request.application,
            request.identity.as_deref(),
            ChallengeOutcome::from_verified(request.challenge_verified),
        )
        .await;

    Json(response)
}

/// Prometheus metrics endpoint.
pub async fn metrics(State(state): State<Arc<AppState>>) -> Response {
    match state.metrics.encode() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(fault) => {
            error!(%fault, "failed to encode metrics");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}
