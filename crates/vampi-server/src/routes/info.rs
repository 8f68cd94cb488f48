//! Informational routes: `/`, `/info`, `/diagnostic`
//!
//! Describe the running service. None of these touch the store.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;
use vampi_core::bootstrap::BootstrapSequencer;

/// Build the info router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(info))
        .route("/info", get(info))
        .route("/diagnostic", get(diagnostic))
        .route("/deployment-test", get(diagnostic))
}

// ── Response types ───────────────────────────────────────────────────

/// Response body for `GET /info`.
#[derive(Debug, Serialize)]
pub struct InfoResponse {
    pub message: &'static str,
    pub help: &'static str,
    pub vulnerable: bool,
}

/// Response body for `GET /diagnostic`.
#[derive(Debug, Serialize)]
pub struct DiagnosticResponse {
    pub message: String,
    /// ISO-8601 timestamp of the request.
    pub timestamp: String,
    pub environment: String,
    pub git_branch: String,
    pub deployment_status: &'static str,
}

// ── Handlers ─────────────────────────────────────────────────────────

/// Service banner with the vulnerable-mode flag.
async fn info(State(state): State<Arc<AppState>>) -> Json<InfoResponse> {
    let snapshot = BootstrapSequencer::info_snapshot(&state.config);
    Json(InfoResponse {
        message: snapshot.service,
        help: snapshot.purpose,
        vulnerable: snapshot.vulnerable,
    })
}

/// Deployment diagnostic. Always reports success once the server is up.
async fn diagnostic(State(state): State<Arc<AppState>>) -> Json<DiagnosticResponse> {
    let snapshot = BootstrapSequencer::info_snapshot(&state.config);
    Json(DiagnosticResponse {
        message: format!("{} deployment diagnostic", snapshot.service),
        timestamp: snapshot.timestamp.to_rfc3339(),
        environment: snapshot.environment,
        git_branch: snapshot.deployment,
        deployment_status: "SUCCESS",
    })
}
