//! Database seeding routes: `/createdb`, `/seed`
//!
//! Drop and recreate the schema, then write the baseline rows. This is an
//! administrative reset; concurrent requests may observe a missing schema
//! while it runs.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::error::AppError;
use crate::state::AppState;

/// Build the seeding router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/createdb", get(populate))
        .route("/seed", post(populate))
}

/// Response body for a successful reset.
#[derive(Debug, Serialize)]
pub struct PopulateResponse {
    pub message: &'static str,
}

/// Reset the store to the baseline rows.
async fn populate(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PopulateResponse>, AppError> {
    state.sequencer.force_reset().await?;
    Ok(Json(PopulateResponse {
        message: "Database populated.",
    }))
}
